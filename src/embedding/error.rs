use std::time::Duration;

use thiserror::Error;

/// Errors produced while obtaining an embedding.
///
/// `Clone` so a single failed call can be handed to every caller waiting on the same key.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EmbeddingError {
    #[error("embedding request to {endpoint} failed: {reason}")]
    Request { endpoint: String, reason: String },

    #[error("embedding service {endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("invalid embedding response: {reason}")]
    InvalidResponse { reason: String },

    #[error("embedding call timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("embedding has dimension {actual}, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding inference failed: {reason}")]
    InferenceFailed { reason: String },
}

impl EmbeddingError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, EmbeddingError::Timeout { .. })
    }
}

