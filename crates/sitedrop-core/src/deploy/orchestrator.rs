//! Deployment orchestration.
//!
//! One [`Deployer::deploy`] call walks a single request through
//! `Start -> Materialized -> Archived -> ProjectResolved -> Published`, and
//! always ends in `CleanedUp`, with `Failed` in between when a step errors.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::archive::{ArchiveBlob, archive_dir};
use crate::backend::HostingBackend;
use crate::error::{DeployError, Result};
use crate::types::{DeploymentDescriptor, FileMap, Platform, ProjectId, ProjectName};
use crate::workspace::{TempWorkspace, validate_file_map, write_file_map};

use super::publisher::publish;
use super::resolver::resolve_project;

/// Pipeline position of one deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStage {
    Start,
    Materialized,
    Archived,
    ProjectResolved,
    Published,
    Failed,
    CleanedUp,
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeployStage::Start => "start",
            DeployStage::Materialized => "materialized",
            DeployStage::Archived => "archived",
            DeployStage::ProjectResolved => "project_resolved",
            DeployStage::Published => "published",
            DeployStage::Failed => "failed",
            DeployStage::CleanedUp => "cleaned_up",
        };
        f.write_str(name)
    }
}

/// A validated deployment request.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub project_name: ProjectName,
    /// Existing project to deploy to; a new project is created when `None`
    pub project_id: Option<ProjectId>,
    pub platform: Platform,
    pub files: FileMap,
}

impl DeployRequest {
    pub fn new(project_name: ProjectName, files: FileMap) -> Self {
        Self {
            project_name,
            project_id: None,
            platform: Platform::default(),
            files,
        }
    }

    pub fn with_project_id(mut self, project_id: Option<ProjectId>) -> Self {
        self.project_id = project_id;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }
}

/// Result of a successful deployment.
#[derive(Debug, Clone)]
pub struct DeployOutcome {
    pub project_id: ProjectId,
    pub descriptor: DeploymentDescriptor,
    /// Number of files in the uploaded archive
    pub files: usize,
    /// blake3 digest of the uploaded archive
    pub archive_digest: String,
}

/// Runs the stage-and-publish pipeline against a hosting backend.
#[derive(Debug)]
pub struct Deployer<B> {
    backend: B,
    temp_root: Option<PathBuf>,
}

impl<B: HostingBackend> Deployer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            temp_root: None,
        }
    }

    /// Create workspaces under `temp_root` instead of the system temp dir.
    pub fn with_temp_root(mut self, temp_root: Option<PathBuf>) -> Self {
        self.temp_root = temp_root;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn temp_root(&self) -> Option<&Path> {
        self.temp_root.as_deref()
    }

    /// Deploy `request.files` and return the backend's descriptor.
    ///
    /// The temporary workspace is removed before this returns, whatever the
    /// outcome. Cleanup problems are logged and never change the result.
    pub async fn deploy(&self, request: DeployRequest) -> Result<DeployOutcome> {
        let DeployRequest {
            project_name,
            project_id,
            platform,
            files,
        } = request;
        let mut stage = DeployStage::Start;

        tracing::info!(
            project = %project_name,
            platform = %platform,
            files = files.len(),
            existing_project = project_id.is_some(),
            "Starting deployment"
        );

        if let Err(err) = validate_file_map(&files) {
            fail(&project_name, &mut stage, &err);
            advance(&project_name, &mut stage, DeployStage::CleanedUp);
            return Err(err);
        }

        let name = project_name.clone();
        let temp_root = self.temp_root.clone();
        let workspace =
            match run_blocking(move || TempWorkspace::create(&name, temp_root.as_deref())).await {
                Ok(workspace) => workspace,
                Err(err) => {
                    fail(&project_name, &mut stage, &err);
                    advance(&project_name, &mut stage, DeployStage::CleanedUp);
                    return Err(err);
                }
            };

        let result = self
            .run_stages(&mut stage, &workspace, files, &project_name, project_id, platform)
            .await;

        if let Err(err) = &result {
            fail(&project_name, &mut stage, err);
        }

        release_workspace(workspace).await;
        advance(&project_name, &mut stage, DeployStage::CleanedUp);

        result
    }

    async fn run_stages(
        &self,
        stage: &mut DeployStage,
        workspace: &TempWorkspace,
        files: FileMap,
        project_name: &ProjectName,
        project_id: Option<ProjectId>,
        platform: Platform,
    ) -> Result<DeployOutcome> {
        let dist = workspace.dist_dir().to_path_buf();

        let written = {
            let dist = dist.clone();
            run_blocking(move || write_file_map(&dist, &files)).await?
        };
        tracing::debug!(project = %project_name, files = written, "Wrote project files");
        advance(project_name, stage, DeployStage::Materialized);

        let archive: ArchiveBlob = run_blocking(move || archive_dir(&dist)).await?;
        advance(project_name, stage, DeployStage::Archived);

        let project_id = resolve_project(&self.backend, project_id, project_name, platform).await?;
        advance(project_name, stage, DeployStage::ProjectResolved);

        let descriptor = publish(&self.backend, &project_id, &archive).await?;
        advance(project_name, stage, DeployStage::Published);

        Ok(DeployOutcome {
            project_id,
            descriptor,
            files: archive.entry_count(),
            archive_digest: archive.digest(),
        })
    }
}

fn advance(project: &ProjectName, stage: &mut DeployStage, next: DeployStage) {
    tracing::debug!(project = %project, from = %stage, to = %next, "Deployment stage");
    *stage = next;
}

fn fail(project: &ProjectName, stage: &mut DeployStage, err: &DeployError) {
    tracing::error!(
        project = %project,
        stage = %stage,
        kind = err.kind(),
        error = %err,
        "Deployment failed"
    );
    *stage = DeployStage::Failed;
}

async fn release_workspace(workspace: TempWorkspace) {
    if let Err(err) = tokio::task::spawn_blocking(move || workspace.release()).await {
        tracing::warn!(error = %err, "Workspace cleanup task failed");
    }
}

/// Run filesystem work on the blocking pool.
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}
