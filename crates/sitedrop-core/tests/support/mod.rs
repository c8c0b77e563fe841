//! In-memory hosting backend shared by the integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use sitedrop_core::archive::ArchiveBlob;
use sitedrop_core::backend::HostingBackend;
use sitedrop_core::error::{DeployError, Result};
use sitedrop_core::types::{
    DeploymentDescriptor, Platform, ProjectDetail, ProjectId, ProjectName, ProjectSummary,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create { name: String, platform: Platform },
    Deploy { project_id: String },
    Search { keyword: String },
    View { project_id: String },
}

/// Backend double that records every call and answers from canned data.
#[derive(Debug)]
pub struct RecordingBackend {
    calls: Mutex<Vec<Call>>,
    uploads: Mutex<Vec<Vec<u8>>>,
    project_id: String,
    descriptor: DeploymentDescriptor,
    search_results: Vec<ProjectSummary>,
    detail: ProjectDetail,
    fail_create: Option<String>,
    fail_deploy: Option<String>,
    fail_search: Option<String>,
    fail_view: Option<String>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
            project_id: "P1".to_string(),
            descriptor: DeploymentDescriptor {
                domain_list: vec!["a.4everland.app".to_string()],
                file_hash: "bafyTEST".to_string(),
            },
            search_results: Vec::new(),
            detail: serde_json::json!({}),
            fail_create: None,
            fail_deploy: None,
            fail_search: None,
            fail_view: None,
        }
    }
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_results(mut self, results: Vec<ProjectSummary>) -> Self {
        self.search_results = results;
        self
    }

    pub fn with_detail(mut self, detail: ProjectDetail) -> Self {
        self.detail = detail;
        self
    }

    pub fn failing_create(mut self, message: &str) -> Self {
        self.fail_create = Some(message.to_string());
        self
    }

    pub fn failing_deploy(mut self, message: &str) -> Self {
        self.fail_deploy = Some(message.to_string());
        self
    }

    pub fn failing_search(mut self, message: &str) -> Self {
        self.fail_search = Some(message.to_string());
        self
    }

    pub fn failing_view(mut self, message: &str) -> Self {
        self.fail_view = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Create { .. }))
            .count()
    }

    /// Archive bytes received by `deploy_project`, in call order.
    pub fn uploads(&self) -> Vec<Vec<u8>> {
        self.uploads.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl HostingBackend for RecordingBackend {
    async fn create_project(&self, name: &ProjectName, platform: Platform) -> Result<ProjectId> {
        self.record(Call::Create {
            name: name.to_string(),
            platform,
        });
        if let Some(message) = &self.fail_create {
            return Err(DeployError::remote("create project", message.clone()));
        }
        ProjectId::new(self.project_id.clone())
    }

    async fn deploy_project(
        &self,
        project_id: &ProjectId,
        archive: &ArchiveBlob,
    ) -> Result<DeploymentDescriptor> {
        self.record(Call::Deploy {
            project_id: project_id.to_string(),
        });
        self.uploads.lock().unwrap().push(archive.as_bytes().to_vec());
        if let Some(message) = &self.fail_deploy {
            return Err(DeployError::remote("deploy project", message.clone()));
        }
        Ok(self.descriptor.clone())
    }

    async fn search_project(&self, keyword: &str) -> Result<Vec<ProjectSummary>> {
        self.record(Call::Search {
            keyword: keyword.to_string(),
        });
        if let Some(message) = &self.fail_search {
            return Err(DeployError::remote("search project", message.clone()));
        }
        Ok(self.search_results.clone())
    }

    async fn view_detail(&self, project_id: &ProjectId) -> Result<ProjectDetail> {
        self.record(Call::View {
            project_id: project_id.to_string(),
        });
        if let Some(message) = &self.fail_view {
            return Err(DeployError::remote("view project", message.clone()));
        }
        Ok(self.detail.clone())
    }
}

/// Names of the entries inside a zip archive, in archive order.
pub fn zip_entry_names(bytes: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    archive.file_names().map(str::to_string).collect()
}

/// Read one entry of a zip archive.
pub fn zip_entry(bytes: &[u8], name: &str) -> Vec<u8> {
    use std::io::Read;

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut content = Vec::new();
    file.read_to_end(&mut content).unwrap();
    content
}

/// Number of entries directly under `dir`.
pub fn dir_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}
