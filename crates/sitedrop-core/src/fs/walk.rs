//! Deterministic directory walking
//!
//! Produces the regular files under a directory in a stable order, useful for:
//! - Reproducible archives
//! - Reading a local site directory into a `FileMap`

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DeployError, IoContext, Result};

/// A regular file found during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    /// Path relative to the walk root, `/`-separated.
    pub relative: String,
    /// Absolute (or root-joined) path on disk.
    pub path: PathBuf,
}

/// Collect all regular files under `root`.
///
/// # Ordering
/// - Entries in each directory are sorted by file name
/// - Directories are descended into at their sorted position
///
/// # Notes
/// - Empty directories produce no entries
/// - Symlinks are rejected rather than followed
/// - Names that are not valid UTF-8 are rejected
/// - A read failure anywhere aborts the walk
pub fn walk_files(root: &Path) -> Result<Vec<WalkedFile>> {
    let mut files = Vec::new();
    walk_dir_recursive(root, "", &mut files)?;
    Ok(files)
}

fn walk_dir_recursive(dir: &Path, base: &str, files: &mut Vec<WalkedFile>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .io_context(|| format!("Failed to read directory: {}", dir.display()))?;

    // Collect and sort entries for deterministic ordering
    let mut sorted_entries: Vec<_> = entries
        .collect::<std::result::Result<Vec<_>, _>>()
        .io_context(|| format!("Failed to read directory entries: {}", dir.display()))?;
    sorted_entries.sort_by_key(|e| e.file_name());

    for entry in sorted_entries {
        let name = entry.file_name();
        let Some(name_str) = name.to_str() else {
            return Err(DeployError::invalid_input(format!(
                "File name is not valid UTF-8: {}",
                entry.path().display()
            )));
        };
        let rel_path = if base.is_empty() {
            name_str.to_string()
        } else {
            format!("{}/{}", base, name_str)
        };

        let ty = entry
            .file_type()
            .io_context(|| format!("Failed to stat file: {}", entry.path().display()))?;

        if ty.is_dir() {
            walk_dir_recursive(&entry.path(), &rel_path, files)?;
        } else if ty.is_file() {
            files.push(WalkedFile {
                relative: rel_path,
                path: entry.path(),
            });
        } else if ty.is_symlink() {
            return Err(DeployError::invalid_input(format!(
                "Symlinks are not supported: {}",
                entry.path().display()
            )));
        } else {
            return Err(DeployError::invalid_input(format!(
                "Unsupported filesystem entry type: {}",
                entry.path().display()
            )));
        }
    }

    Ok(())
}
