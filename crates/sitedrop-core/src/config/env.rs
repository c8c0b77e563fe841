//! Environment overrides for configuration values.

use std::path::PathBuf;

use anyhow::Context;
use url::Url;

use super::SitedropConfig;

pub const API_URL_ENV: &str = "SITEDROP_API_URL";
pub const TOKEN_ENV: &str = "SITEDROP_TOKEN";
pub const TEMP_ROOT_ENV: &str = "SITEDROP_TEMP_ROOT";

/// Overlay environment values onto `config`.
///
/// `lookup` abstracts the environment so callers (and tests) can supply their
/// own source. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut SitedropConfig, lookup: F) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(raw) = get(API_URL_ENV) {
        config.api.base_url = Url::parse(raw.trim())
            .with_context(|| format!("Invalid {} value: {}", API_URL_ENV, raw))?;
    }
    if let Some(token) = get(TOKEN_ENV) {
        config.api.token = Some(token);
    }
    if let Some(root) = get(TEMP_ROOT_ENV) {
        config.deploy.temp_root = Some(PathBuf::from(root));
    }

    Ok(())
}
