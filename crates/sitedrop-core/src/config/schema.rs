//! Configuration schema for sitedrop.toml
//!
//! ```toml
//! [api]
//! base_url = "https://hosting.api.4everland.org"
//! token = "..."
//! timeout_secs = 120
//!
//! [deploy]
//! temp_root = "/var/tmp"
//! default_platform = "IPFS"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::Platform;

/// Default hosting API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://hosting.api.4everland.org";

/// Root configuration structure for sitedrop.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitedropConfig {
    /// Hosting API connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Deployment pipeline settings
    #[serde(default)]
    pub deploy: DeployConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// Sent as the `token` header; usually supplied through the environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Whole-request timeout, including the archive upload
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Parent directory for temporary workspaces (system temp dir when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_root: Option<PathBuf>,

    /// Platform used when a tool call does not name one
    #[serde(default)]
    pub default_platform: Platform,
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_user_agent() -> String {
    format!("sitedrop/{}", env!("CARGO_PKG_VERSION"))
}
