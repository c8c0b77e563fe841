//! Project resolution: reuse a supplied project or create a new one.

use crate::backend::HostingBackend;
use crate::error::Result;
use crate::types::{Platform, ProjectId, ProjectName};

/// Return `project_id` when supplied, otherwise create a project.
///
/// A supplied id is not checked against the backend; an unknown id surfaces
/// later as a publish failure. Creation is attempted exactly once.
pub async fn resolve_project<B: HostingBackend>(
    backend: &B,
    project_id: Option<ProjectId>,
    project_name: &ProjectName,
    platform: Platform,
) -> Result<ProjectId> {
    if let Some(id) = project_id {
        tracing::debug!(project_id = %id, "Deploying to existing project");
        return Ok(id);
    }

    tracing::info!(project = %project_name, platform = %platform, "Creating project");
    let id = backend.create_project(project_name, platform).await?;
    tracing::info!(project = %project_name, project_id = %id, "Created project");
    Ok(id)
}
