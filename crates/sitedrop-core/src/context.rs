//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};

use crate::backend::HttpBackend;
use crate::config::{ConfigStore, SitedropConfig};
use crate::deploy::Deployer;
use crate::tools::ToolHost;

/// Unified application context for dependency injection.
///
/// Holds the effective configuration and builds the services that depend on
/// it. Frontends create this once and pass it to commands.
#[derive(Debug, Clone)]
pub struct AppContext {
    config: SitedropConfig,
    config_path: PathBuf,
}

impl AppContext {
    pub fn new(config: SitedropConfig, config_path: PathBuf) -> Self {
        Self {
            config,
            config_path,
        }
    }

    /// Load the effective configuration from `config_path`, or from the
    /// default location when `None`.
    pub fn load(config_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let store = match config_path {
            Some(path) => ConfigStore::from_path(path),
            None => ConfigStore::from_default_location()?,
        };
        let config = store.load_effective()?;
        tracing::debug!(
            path = %store.config_path().display(),
            base_url = %config.api.base_url,
            "Loaded configuration"
        );
        Ok(Self::new(config, store.config_path().to_path_buf()))
    }

    pub fn config(&self) -> &SitedropConfig {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Get an HTTP client for the configured hosting API.
    pub fn http_backend(&self) -> anyhow::Result<HttpBackend> {
        HttpBackend::new(&self.config.api)
    }

    /// Get a Deployer over the configured backend.
    pub fn deployer(&self) -> anyhow::Result<Deployer<HttpBackend>> {
        Ok(Deployer::new(self.http_backend()?).with_temp_root(self.config.deploy.temp_root.clone()))
    }

    /// Get a ToolHost serving all tools.
    pub fn tool_host(&self) -> anyhow::Result<ToolHost<HttpBackend>> {
        Ok(ToolHost::new(self.deployer()?)
            .with_default_platform(self.config.deploy.default_platform))
    }
}
