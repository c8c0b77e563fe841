//! Path sandboxing for materialized files
//!
//! Validates caller-supplied relative paths so that every write lands inside
//! the workspace `dist` directory.

use std::path::{Component, Path, PathBuf};

use crate::error::{DeployError, Result};

/// Resolve a caller-supplied relative path against `root`.
///
/// Returns the normalized destination on success.
///
/// # Errors
///
/// Returns `InvalidInput` if the path:
/// - is empty, contains a NUL byte or a backslash
/// - is absolute
/// - resolves to `root` itself
/// - contains traversal that escapes `root`
pub fn resolve_inside(root: &Path, relative: &str) -> Result<PathBuf> {
    if relative.is_empty() {
        return Err(DeployError::invalid_input("file path must not be empty"));
    }
    if relative.contains('\0') {
        return Err(DeployError::invalid_input(format!(
            "file path '{}' contains a NUL byte",
            relative.escape_default()
        )));
    }
    if relative.contains('\\') {
        return Err(DeployError::invalid_input(format!(
            "file path '{}' must use forward slashes",
            relative
        )));
    }

    let rel_path = Path::new(relative);
    if rel_path.is_absolute() || relative.starts_with('/') {
        return Err(DeployError::invalid_input(format!(
            "file path '{}' is absolute; only relative paths are allowed",
            relative
        )));
    }

    // Lexical normalization: resolve ".." without touching the filesystem.
    let normalized_root = normalize_path(root);
    let normalized = normalize_path(&root.join(rel_path));

    if !normalized.starts_with(&normalized_root) {
        return Err(DeployError::invalid_input(format!(
            "file path '{}' resolves outside the deploy directory (path traversal)",
            relative
        )));
    }
    if normalized == normalized_root {
        return Err(DeployError::invalid_input(format!(
            "file path '{}' does not name a file",
            relative
        )));
    }

    Ok(normalized)
}

/// Lexically normalize a path by resolving `.` and `..` components without filesystem access.
///
/// Unlike `canonicalize()`, this doesn't require the path to exist and doesn't follow symlinks.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::ParentDir => match components.last() {
                // ".." at the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                Some(Component::ParentDir) | None => components.push(component),
                Some(_) => {
                    components.pop();
                }
            },
            Component::CurDir => {}
            c => components.push(c),
        }
    }

    components.iter().collect()
}
