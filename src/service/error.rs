use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::backend::BackendError;
use crate::embedding::EmbeddingError;

/// External system a request depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    EmbeddingService,
    SearchBackend,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dependency::EmbeddingService => "embedding service",
            Dependency::SearchBackend => "search backend",
        })
    }
}

/// Per-request failure. Each one ends only the request that raised it.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request itself is invalid. Not retriable.
    #[error("invalid request: {0}")]
    Client(String),

    /// A dependency did not answer in time. Retriable.
    #[error("{dependency} timed out after {timeout:?}")]
    DependencyTimeout {
        dependency: Dependency,
        timeout: Duration,
    },

    /// A dependency answered with an error or garbage.
    #[error("{dependency} failed: {message}")]
    DependencyFailure {
        dependency: Dependency,
        message: String,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn client(message: impl Into<String>) -> Self {
        ServiceError::Client(message.into())
    }

    pub fn is_retriable(&self) -> bool {
        matches!(self, ServiceError::DependencyTimeout { .. })
    }

    /// Stable machine-readable code for the error body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Client(_) => "invalid_request",
            ServiceError::DependencyTimeout { .. } => "dependency_timeout",
            ServiceError::DependencyFailure { .. } => "dependency_failure",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

impl From<EmbeddingError> for ServiceError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::Timeout { timeout } => ServiceError::DependencyTimeout {
                dependency: Dependency::EmbeddingService,
                timeout,
            },
            other => ServiceError::DependencyFailure {
                dependency: Dependency::EmbeddingService,
                message: other.to_string(),
            },
        }
    }
}

impl From<BackendError> for ServiceError {
    fn from(err: BackendError) -> Self {
        ServiceError::DependencyFailure {
            dependency: Dependency::SearchBackend,
            message: err.to_string(),
        }
    }
}
