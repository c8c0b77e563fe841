//! Sitedrop Core Library
//!
//! Stages in-memory site files into a temporary workspace, packs them into a
//! zip archive, and publishes them to the 4EVERLAND decentralized hosting
//! service. Also exposes the agent-facing tools built on top of that pipeline.

pub mod archive;
pub mod backend;
pub mod config;
pub mod context;
pub mod deploy;
pub mod error;
pub mod fs;
pub mod tools;
pub mod types;
pub mod workspace;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ApiConfig, ConfigStore, DeployConfig, SitedropConfig};
    pub use crate::context::AppContext;

    // Pipeline
    pub use crate::archive::{ArchiveBlob, archive_dir};
    pub use crate::deploy::{DeployOutcome, DeployRequest, DeployStage, Deployer};
    pub use crate::error::{DeployError, Result};
    pub use crate::workspace::{TempWorkspace, materialize};

    // Backend
    pub use crate::backend::{HostingBackend, HttpBackend};

    // Types
    pub use crate::types::{
        DeploymentDescriptor, FileMap, Platform, ProjectDetail, ProjectId, ProjectName,
        ProjectSummary,
    };

    // Tools
    pub use crate::tools::{ToolHost, ToolResponse, ToolStatus};
}
