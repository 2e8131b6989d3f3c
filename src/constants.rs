//! Cross-cutting, shared constants.
//!
//! The embedding dimension is a deployment-wide invariant: every vector stored in the
//! [`crate::cache::EmbeddingCache`] and every vector sent to the backend has exactly this many
//! components. The default below is used when `SEMGATE_EMBEDDING_DIM` is not set.

use thiserror::Error;

pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Separator placed between highlight fragments when building a result snippet.
pub const SNIPPET_SEPARATOR: &str = " ... ";

/// Default weight applied to the secondary clause of a hybrid query.
pub const DEFAULT_HYBRID_BOOST: f32 = 0.3;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 1000;

/// Upper bound on `offset + rows`. Solr parses both as 32-bit ints.
pub const MAX_RESULT_WINDOW: u64 = i32::MAX as u64;

pub const DEFAULT_TOP_K: u32 = 10;

pub const DEFAULT_EMBEDDING_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_BACKEND_TIMEOUT_MS: u64 = 10_000;

/// Namespace used in cache keys for the deployment-wide embedding service.
pub const DEFAULT_EMBEDDING_NAMESPACE: &str = "default";

/// Error returned when a vector does not have the configured dimension.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    #[error("embedding dimension cannot be zero")]
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Validates a configured embedding dimension.
pub fn validate_dimension(dim: usize) -> Result<(), DimValidationError> {
    if dim == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    Ok(())
}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// # Example
///
/// ```
/// use semgate::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// validate_embedding_dim(384, DEFAULT_EMBEDDING_DIM).unwrap();
/// assert!(validate_embedding_dim(768, DEFAULT_EMBEDDING_DIM).is_err());
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
