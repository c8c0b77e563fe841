//! Shared core types used across the pipeline, backend, and tool layers.

mod file_map;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeployError;

pub use file_map::FileMap;

/// Validated project name.
///
/// Used both as a directory-name fragment and as the display name sent to the
/// hosting backend, so it is restricted to ASCII alphanumerics, `_` and `-`,
/// and may not start or end with `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn parse(raw: &str) -> Result<Self, DeployError> {
        if raw.is_empty() {
            return Err(DeployError::invalid_input("project name must not be empty"));
        }

        let is_name_char = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-';
        if let Some(bad) = raw.chars().find(|c| !is_name_char(*c)) {
            return Err(DeployError::invalid_input(format!(
                "project name '{}' contains invalid character '{}' \
                (allowed: alphanumeric, underscore, hyphen)",
                raw, bad
            )));
        }

        if raw.starts_with('-') || raw.ends_with('-') {
            return Err(DeployError::invalid_input(format!(
                "project name '{}' cannot start or end with a hyphen",
                raw
            )));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProjectName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Decentralized storage backend a project publishes to.
///
/// Chosen when the project is created; the backend does not allow changing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    #[default]
    Ipfs,
    /// Arweave
    Ar,
    /// Internet Computer
    Ic,
    /// BNB Greenfield
    Greenfield,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Ipfs,
        Platform::Ar,
        Platform::Ic,
        Platform::Greenfield,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ipfs => "IPFS",
            Platform::Ar => "AR",
            Platform::Ic => "IC",
            Platform::Greenfield => "GREENFIELD",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                DeployError::invalid_input(format!(
                    "unknown platform '{}' (expected one of IPFS, AR, IC, GREENFIELD)",
                    s
                ))
            })
    }
}

/// Opaque project identifier assigned by the hosting backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(raw: impl Into<String>) -> Result<Self, DeployError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(DeployError::invalid_input("project id must not be empty"));
        }
        Ok(Self(raw))
    }

    /// Treat a missing or empty id as "not supplied". Any other value is
    /// kept as given.
    pub fn from_optional(raw: Option<&str>) -> Option<Self> {
        raw.filter(|s| !s.is_empty()).map(|s| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a successful publish, returned verbatim from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentDescriptor {
    /// Domains the deployment is reachable under.
    #[serde(default)]
    pub domain_list: Vec<String>,
    /// Content identifier (CID) of the published archive.
    pub file_hash: String,
}

/// Project entry returned by search, kept as raw JSON.
pub type ProjectSummary = serde_json::Value;

/// Project detail returned by view, kept as raw JSON.
pub type ProjectDetail = serde_json::Value;
