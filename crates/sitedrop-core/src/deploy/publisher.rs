//! Archive upload.

use crate::archive::ArchiveBlob;
use crate::backend::HostingBackend;
use crate::error::Result;
use crate::types::{DeploymentDescriptor, ProjectId};

/// Upload `archive` as a new deployment of `project_id`.
///
/// The descriptor is returned exactly as the backend reported it.
pub async fn publish<B: HostingBackend>(
    backend: &B,
    project_id: &ProjectId,
    archive: &ArchiveBlob,
) -> Result<DeploymentDescriptor> {
    tracing::info!(
        project_id = %project_id,
        bytes = archive.len(),
        entries = archive.entry_count(),
        digest = %archive.digest(),
        "Uploading archive"
    );

    let descriptor = backend.deploy_project(project_id, archive).await?;

    tracing::info!(
        project_id = %project_id,
        cid = %descriptor.file_hash,
        domains = ?descriptor.domain_list,
        "Published deployment"
    );
    Ok(descriptor)
}
