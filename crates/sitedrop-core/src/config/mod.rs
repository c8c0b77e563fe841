//! Configuration loading
//!
//! Settings come from two layers, later ones winning:
//! - File: `<config_dir>/sitedrop/sitedrop.toml` (or an explicit path)
//! - Environment: `SITEDROP_API_URL`, `SITEDROP_TOKEN`, `SITEDROP_TEMP_ROOT`

pub mod env;
pub mod schema;
pub mod store;

pub use env::apply_env_overrides;
pub use schema::{ApiConfig, DEFAULT_BASE_URL, DeployConfig, SitedropConfig};
pub use store::{CONFIG_FILE_NAME, ConfigStore};
