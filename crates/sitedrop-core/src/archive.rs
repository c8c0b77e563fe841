//! Zip packaging of a deploy directory
//!
//! Packs the `dist` tree of a workspace into an in-memory zip archive that the
//! hosting backend unpacks as the site root.

use std::io::{Cursor, Write};
use std::path::Path;

use crate::error::{IoContext, Result};
use crate::fs::walk::{WalkedFile, walk_files};

/// Fixed permissions for every archived file.
const ENTRY_MODE: u32 = 0o644;

/// In-memory zip archive of a directory tree.
#[derive(Debug, Clone)]
pub struct ArchiveBlob {
    bytes: Vec<u8>,
    entries: usize,
}

impl ArchiveBlob {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of files stored in the archive.
    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// blake3 digest of the archive bytes, hex encoded.
    pub fn digest(&self) -> String {
        blake3::hash(&self.bytes).to_hex().to_string()
    }
}

/// Archive every regular file under `dir`.
///
/// Entries are written in walk order with a fixed timestamp and mode, so the
/// same tree always produces the same bytes. An empty directory produces a
/// valid archive with no entries.
pub fn archive_dir(dir: &Path) -> Result<ArchiveBlob> {
    let files = walk_files(dir)?;
    let blob = pack(&files)?;
    tracing::debug!(
        dir = %dir.display(),
        entries = blob.entries,
        bytes = blob.len(),
        "Created archive"
    );
    Ok(blob)
}

/// Zip the walked files in order. A file that can no longer be read fails the
/// whole archive.
fn pack(files: &[WalkedFile]) -> Result<ArchiveBlob> {
    let mut buf = Cursor::new(Vec::new());
    let mut zip = zip::ZipWriter::new(&mut buf);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(ENTRY_MODE);

    for file in files {
        let content = std::fs::read(&file.path)
            .io_context(|| format!("Failed to read file: {}", file.path.display()))?;

        zip.start_file(file.relative.as_str(), options)?;
        zip.write_all(&content)
            .io_context(|| format!("Failed to write archive entry: {}", file.relative))?;
    }

    zip.finish()?;

    Ok(ArchiveBlob {
        bytes: buf.into_inner(),
        entries: files.len(),
    })
}
