//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::constants::DimValidationError;

/// Errors that can occur during configuration loading and validation.
///
/// All of these are fatal at startup; none is reachable while serving a request.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// A numeric environment variable could not be parsed.
    #[error("invalid value '{value}' for {name}")]
    InvalidNumber { name: &'static str, value: String },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a file (when a file was expected).
    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// The deployment file could not be read.
    #[error("failed to read deployment file {path}: {source}")]
    DeploymentIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The deployment file is not valid JSON for the deployment schema
    /// (this includes an unknown vector topology).
    #[error("invalid deployment definition: {source}")]
    InvalidDeployment {
        #[source]
        source: serde_json::Error,
    },

    /// Two vector field configs target the same backend vector field.
    #[error("duplicate target vector field '{field}'")]
    DuplicateVectorField { field: String },

    /// Two vector field configs share a logical name.
    #[error("duplicate vector field name '{name}'")]
    DuplicateVectorName { name: String },

    /// Embedding dimension is invalid.
    #[error("invalid embedding dimension: {0}")]
    InvalidDimension(#[from] DimValidationError),

    /// Any other invalid setting.
    #[error("invalid configuration: {reason}")]
    Invalid { reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            reason: reason.into(),
        }
    }
}
