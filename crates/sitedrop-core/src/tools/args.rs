//! Typed tool arguments as decoded from the transport's JSON.

use serde::{Deserialize, Serialize};

use crate::types::{FileMap, Platform};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploySiteArgs {
    /// Map of file paths to their content
    pub code_files: FileMap,
    /// Alphanumeric, underscore and hyphen; no leading or trailing hyphen
    pub project_name: String,
    /// Existing project to deploy to; a new project is created when absent or empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Storage platform for a newly created project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchProjectArgs {
    pub keyword: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewProjectArgs {
    pub id: String,
}
