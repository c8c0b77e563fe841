//! In-memory set of files to deploy.

use std::collections::BTreeMap;
use std::path::Path;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};

use crate::error::{IoContext, Result};
use crate::fs::walk::walk_files;

/// Relative path (forward-slash separated) to file content.
///
/// Ordered so that every consumer sees entries in the same sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, String>")]
pub struct FileMap {
    entries: BTreeMap<String, Vec<u8>>,
}

impl FileMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.entries.insert(path.into(), content.into());
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries
            .iter()
            .map(|(path, content)| (path.as_str(), content.as_slice()))
    }

    /// Read every regular file under `dir` into a map keyed by relative path.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut map = Self::new();
        for file in walk_files(dir)? {
            let content = std::fs::read(&file.path)
                .io_context(|| format!("Failed to read file: {}", file.path.display()))?;
            map.insert(file.relative, content);
        }
        Ok(map)
    }
}

impl From<BTreeMap<String, String>> for FileMap {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self {
            entries: map.into_iter().map(|(k, v)| (k, v.into_bytes())).collect(),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for FileMap
where
    K: Into<String>,
    V: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (path, content) in iter {
            map.insert(path, content);
        }
        map
    }
}

impl Serialize for FileMap {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (path, content) in &self.entries {
            map.serialize_entry(path, &String::from_utf8_lossy(content))?;
        }
        map.end()
    }
}
