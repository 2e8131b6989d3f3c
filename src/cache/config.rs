use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::constants::DEFAULT_EMBEDDING_TIMEOUT_MS;

/// Settings for [`super::EmbeddingCache`].
#[derive(Debug, Clone)]
pub struct EmbeddingCacheConfig {
    /// Snapshot file.
    pub path: PathBuf,
    /// Required length of every vector.
    pub dimension: usize,
    /// Max entries kept in memory.
    pub capacity: u64,
    /// Evict entries not read for this long.
    pub idle_timeout: Option<Duration>,
    /// Write the snapshot after every new entry.
    pub persist_on_write: bool,
    /// Deadline for one embedding call.
    pub call_timeout: Duration,
}

impl EmbeddingCacheConfig {
    const DEFAULT_CAPACITY: u64 = 100_000;

    pub fn new(path: impl Into<PathBuf>, dimension: usize) -> Self {
        Self {
            path: path.into(),
            dimension,
            capacity: Self::DEFAULT_CAPACITY,
            idle_timeout: None,
            persist_on_write: true,
            call_timeout: Duration::from_millis(DEFAULT_EMBEDDING_TIMEOUT_MS),
        }
    }

    pub fn capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn idle_timeout(mut self, idle: Duration) -> Self {
        self.idle_timeout = Some(idle);
        self
    }

    pub fn persist_on_write(mut self, enabled: bool) -> Self {
        self.persist_on_write = enabled;
        self
    }

    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}

impl From<&Config> for EmbeddingCacheConfig {
    fn from(config: &Config) -> Self {
        Self {
            path: config.cache_path.clone(),
            dimension: config.embedding_dim,
            capacity: config.cache_capacity,
            idle_timeout: config.cache_idle_timeout,
            persist_on_write: config.cache_persist_on_write,
            call_timeout: config.embedding_timeout,
        }
    }
}
