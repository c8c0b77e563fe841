//! Temporary deploy workspaces and file materialization.
//!
//! A [`TempWorkspace`] owns a uniquely-named directory for the duration of one
//! deployment. Files from a [`FileMap`] are written under its `dist`
//! subdirectory, which is what gets archived and uploaded.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{DeployError, IoContext, Result};
use crate::fs::sandbox::resolve_inside;
use crate::types::{FileMap, ProjectName};

/// Name of the build-output directory inside a workspace.
pub const DIST_DIR: &str = "dist";

/// Scoped temporary directory for one deployment.
///
/// Removed by [`TempWorkspace::release`], or on drop if the owner never gets
/// that far (for example when the deploy future is cancelled).
#[derive(Debug)]
pub struct TempWorkspace {
    dir: TempDir,
    dist: PathBuf,
}

impl TempWorkspace {
    /// Create a workspace with an empty `dist` directory.
    ///
    /// `temp_root` overrides the system temp directory.
    pub fn create(project_name: &ProjectName, temp_root: Option<&Path>) -> Result<Self> {
        let prefix = format!("sitedrop-{}-", project_name);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);

        let dir = match temp_root {
            Some(root) => {
                std::fs::create_dir_all(root).io_context(|| {
                    format!("Failed to create temp root: {}", root.display())
                })?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
        .io_context(|| "Failed to create temporary workspace")?;

        let dist = dir.path().join(DIST_DIR);
        std::fs::create_dir(&dist)
            .io_context(|| format!("Failed to create directory: {}", dist.display()))?;

        tracing::debug!(workspace = %dir.path().display(), "Created temporary workspace");
        Ok(Self { dir, dist })
    }

    /// Workspace root directory.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// The `dist` directory that gets archived.
    pub fn dist_dir(&self) -> &Path {
        &self.dist
    }

    /// Remove the workspace recursively.
    ///
    /// Failures are logged and swallowed; the caller's result must not depend
    /// on cleanup.
    pub fn release(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => tracing::debug!(workspace = %path.display(), "Removed temporary workspace"),
            Err(err) => tracing::warn!(
                workspace = %path.display(),
                error = %err,
                "Failed to remove temporary workspace"
            ),
        }
    }
}

/// Create a fresh workspace and write `files` into its `dist` directory.
///
/// On failure the partially written workspace is dropped, which removes it.
pub fn materialize(
    project_name: &ProjectName,
    files: &FileMap,
    temp_root: Option<&Path>,
) -> Result<TempWorkspace> {
    validate_file_map(files)?;
    let workspace = TempWorkspace::create(project_name, temp_root)?;
    let written = write_file_map(workspace.dist_dir(), files)?;
    tracing::debug!(files = written, "Materialized project files");
    Ok(workspace)
}

/// Check every path of `files` without touching the filesystem.
pub fn validate_file_map(files: &FileMap) -> Result<()> {
    plan_writes(Path::new(DIST_DIR), files).map(|_| ())
}

/// Write every entry of `files` below `dist_root`.
///
/// All paths are validated before the first write, so an unsafe entry never
/// leaves partial output behind. Returns the number of files written.
pub fn write_file_map(dist_root: &Path, files: &FileMap) -> Result<usize> {
    let targets = plan_writes(dist_root, files)?;

    for (dest, content) in &targets {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).io_context(|| {
                format!("Failed to create parent directory: {}", parent.display())
            })?;
        }
        std::fs::write(dest, content)
            .io_context(|| format!("Failed to write file: {}", dest.display()))?;
    }

    Ok(targets.len())
}

/// Resolve every destination up front and reject collisions.
fn plan_writes<'a>(dist_root: &Path, files: &'a FileMap) -> Result<Vec<(PathBuf, &'a [u8])>> {
    let mut seen = std::collections::HashMap::with_capacity(files.len());
    let mut targets = Vec::with_capacity(files.len());

    for (relative, content) in files.iter() {
        let dest = resolve_inside(dist_root, relative)?;
        if let Some(previous) = seen.insert(dest.clone(), relative) {
            return Err(DeployError::invalid_input(format!(
                "file paths '{}' and '{}' resolve to the same destination",
                previous, relative
            )));
        }
        targets.push((dest, content));
    }

    Ok(targets)
}
