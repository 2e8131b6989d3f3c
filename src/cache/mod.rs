//! Embedding cache: in-memory moka cache backed by an rkyv snapshot file.

mod config;
mod embedding;
pub mod error;
pub mod snapshot;


pub use config::EmbeddingCacheConfig;
pub use embedding::{CacheStats, EmbeddingCache};
pub use error::{CacheError, CacheResult};
pub use snapshot::{CacheSnapshot, SNAPSHOT_VERSION, SnapshotEntry};
