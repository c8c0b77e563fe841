//! Error taxonomy for the deployment pipeline.
//!
//! Every step of a deployment reports one of these variants. The tool layer
//! turns them into `status: "error"` responses, so nothing here ever crosses
//! the tool boundary as a raw error.

use std::io;

use thiserror::Error;

/// Result alias used throughout the pipeline.
pub type Result<T> = std::result::Result<T, DeployError>;

/// Errors that can occur while deploying or querying projects.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Malformed project name, unsafe file path, or undecodable tool arguments.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Filesystem failure while materializing, archiving, or reading a tree.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// The hosting backend rejected a request or could not be reached.
    #[error("{operation} failed: {message}")]
    Remote {
        operation: &'static str,
        message: String,
    },

    /// Anything that does not fit the categories above.
    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl DeployError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn remote(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Remote {
            operation,
            message: message.into(),
        }
    }

    /// Short, stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Io { .. } => "io",
            Self::Remote { .. } => "remote",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Attach a human-readable context to `std::io` results.
pub(crate) trait IoContext<T> {
    fn io_context<F, S>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IoContext<T> for std::result::Result<T, io::Error> {
    fn io_context<F, S>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|source| DeployError::io(context(), source))
    }
}

impl From<zip::result::ZipError> for DeployError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(source) => Self::io("Failed to write archive", source),
            other => Self::Unknown(format!("archive error: {other}")),
        }
    }
}

impl From<tokio::task::JoinError> for DeployError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Unknown(format!("background task failed: {err}"))
    }
}
