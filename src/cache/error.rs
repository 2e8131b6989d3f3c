use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
/// Errors returned while loading or persisting the embedding cache snapshot.
pub enum CacheError {
    /// IO error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be encoded or decoded.
    #[error("snapshot serialization error: {0}")]
    Serialization(String),

    /// Atomic rename of the temp file onto the snapshot path failed.
    #[error("failed to persist snapshot to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Blocking snapshot task panicked or was cancelled.
    #[error("snapshot task failed: {0}")]
    Task(String),
}

/// Convenience result type for cache persistence.
pub type CacheResult<T> = Result<T, CacheError>;
