//! Remote hosting backend.
//!
//! The pipeline only talks to the hosting provider through [`HostingBackend`],
//! so tests and alternative transports can supply their own implementation.

pub mod http;

use std::future::Future;

use crate::archive::ArchiveBlob;
use crate::error::Result;
use crate::types::{
    DeploymentDescriptor, Platform, ProjectDetail, ProjectId, ProjectName, ProjectSummary,
};

pub use http::HttpBackend;

/// Operations offered by the hosting provider.
///
/// None of these are retried by callers: project creation in particular is
/// not idempotent.
pub trait HostingBackend: Send + Sync {
    /// Create a project and return its newly assigned identifier.
    fn create_project(
        &self,
        name: &ProjectName,
        platform: Platform,
    ) -> impl Future<Output = Result<ProjectId>> + Send;

    /// Upload an archive as a new deployment of `project_id`.
    fn deploy_project(
        &self,
        project_id: &ProjectId,
        archive: &ArchiveBlob,
    ) -> impl Future<Output = Result<DeploymentDescriptor>> + Send;

    /// Search projects by keyword.
    fn search_project(
        &self,
        keyword: &str,
    ) -> impl Future<Output = Result<Vec<ProjectSummary>>> + Send;

    /// Fetch the detail record of one project.
    fn view_detail(
        &self,
        project_id: &ProjectId,
    ) -> impl Future<Output = Result<ProjectDetail>> + Send;
}

impl<B: HostingBackend> HostingBackend for &B {
    fn create_project(
        &self,
        name: &ProjectName,
        platform: Platform,
    ) -> impl Future<Output = Result<ProjectId>> + Send {
        (**self).create_project(name, platform)
    }

    fn deploy_project(
        &self,
        project_id: &ProjectId,
        archive: &ArchiveBlob,
    ) -> impl Future<Output = Result<DeploymentDescriptor>> + Send {
        (**self).deploy_project(project_id, archive)
    }

    fn search_project(
        &self,
        keyword: &str,
    ) -> impl Future<Output = Result<Vec<ProjectSummary>>> + Send {
        (**self).search_project(keyword)
    }

    fn view_detail(
        &self,
        project_id: &ProjectId,
    ) -> impl Future<Output = Result<ProjectDetail>> + Send {
        (**self).view_detail(project_id)
    }
}
