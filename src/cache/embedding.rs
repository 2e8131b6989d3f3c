use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use moka::future::Cache;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::config::EmbeddingCacheConfig;
use super::error::{CacheError, CacheResult};
use super::snapshot::{CacheSnapshot, SNAPSHOT_VERSION, SnapshotEntry};
use crate::constants::{
    DEFAULT_EMBEDDING_NAMESPACE, DimValidationError, validate_embedding_dim,
};
use crate::embedding::{EmbedderMode, EmbeddingClient, EmbeddingError};
use crate::hashing::{hash_content, key_prefix};

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct CacheStats {
    pub entry_count: u64,
    /// Calls made to the embedding client since open (including failed ones).
    pub client_calls: u64,
}

/// Memoizes embedding vectors by content hash.
///
/// Concurrent misses on the same key share one client call. Failures are returned to every
/// waiter and nothing is stored, so the next call retries.
pub struct EmbeddingCache {
    entries: Cache<[u8; 32], Arc<Vec<f32>>>,
    client: Arc<dyn EmbeddingClient>,
    config: EmbeddingCacheConfig,
    persist_lock: Mutex<()>,
    client_calls: AtomicU64,
}

impl std::fmt::Debug for EmbeddingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingCache")
            .field("path", &self.config.path)
            .field("dimension", &self.config.dimension)
            .field("mode", &self.client.mode())
            .finish()
    }
}

impl EmbeddingCache {
    /// Creates the cache and loads the snapshot at `config.path` if there is one.
    ///
    /// A snapshot written with another dimension or format version, or one that cannot be
    /// decoded, is discarded with a warning. Other IO errors are returned.
    pub async fn open(
        config: EmbeddingCacheConfig,
        client: Arc<dyn EmbeddingClient>,
    ) -> CacheResult<Self> {
        let mut builder = Cache::builder().max_capacity(config.capacity);
        if let Some(idle) = config.idle_timeout {
            builder = builder.time_to_idle(idle);
        }

        let cache = Self {
            entries: builder.build(),
            client,
            config,
            persist_lock: Mutex::new(()),
            client_calls: AtomicU64::new(0),
        };

        let path = cache.config.path.clone();
        let loaded = tokio::task::spawn_blocking(move || CacheSnapshot::read_from(&path))
            .await
            .map_err(|e| CacheError::Task(e.to_string()))?;

        match loaded {
            Ok(Some(snapshot)) => cache.restore(snapshot).await,
            Ok(None) => {
                debug!(path = %cache.config.path.display(), "No embedding snapshot, starting empty");
            }
            Err(CacheError::Serialization(reason)) => {
                warn!(
                    path = %cache.config.path.display(),
                    %reason,
                    "Discarding unreadable embedding snapshot"
                );
            }
            Err(e) => return Err(e),
        }

        Ok(cache)
    }

    async fn restore(&self, snapshot: CacheSnapshot) {
        if snapshot.version != SNAPSHOT_VERSION {
            warn!(
                found = snapshot.version,
                expected = SNAPSHOT_VERSION,
                "Discarding embedding snapshot with unknown version"
            );
            return;
        }
        if snapshot.dimension as usize != self.config.dimension {
            warn!(
                found = snapshot.dimension,
                expected = self.config.dimension,
                "Discarding embedding snapshot with different dimension"
            );
            return;
        }

        let mut restored = 0usize;
        for entry in snapshot.entries {
            if entry.vector.len() != self.config.dimension {
                continue;
            }
            self.entries.insert(entry.key, Arc::new(entry.vector)).await;
            restored += 1;
        }

        info!(
            path = %self.config.path.display(),
            entries = restored,
            "Embedding snapshot loaded"
        );
    }

    /// Resolves `text` with the default embedding service.
    pub async fn resolve(&self, text: &str) -> Result<Arc<Vec<f32>>, EmbeddingError> {
        self.resolve_with(None, text).await
    }

    /// Resolves `text`, using `endpoint` instead of the default service when set.
    ///
    /// The endpoint is part of the cache key.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn resolve_with(
        &self,
        endpoint: Option<&str>,
        text: &str,
    ) -> Result<Arc<Vec<f32>>, EmbeddingError> {
        let key = hash_content(endpoint.unwrap_or(DEFAULT_EMBEDDING_NAMESPACE), text);

        if let Some(vector) = self.entries.get(&key).await {
            debug!(key = %key_prefix(&key), "Embedding cache hit");
            return Ok(vector);
        }

        let initialized = AtomicBool::new(false);
        let result = self
            .entries
            .try_get_with(key, async {
                initialized.store(true, Ordering::Release);
                self.fetch(endpoint, text).await.map(Arc::new)
            })
            .await;

        match result {
            Ok(vector) => {
                if initialized.load(Ordering::Acquire) {
                    debug!(key = %key_prefix(&key), "Embedding cache miss, stored");
                    if self.config.persist_on_write
                        && let Err(e) = self.flush().await
                    {
                        warn!(error = %e, "Failed to persist embedding snapshot");
                    }
                }
                Ok(vector)
            }
            Err(err) => Err((*err).clone()),
        }
    }

    async fn fetch(&self, endpoint: Option<&str>, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.client_calls.fetch_add(1, Ordering::Relaxed);

        let timeout = self.config.call_timeout;
        let vector = tokio::time::timeout(timeout, self.client.embed(endpoint, text))
            .await
            .map_err(|_| EmbeddingError::Timeout { timeout })??;

        if let Err(DimValidationError::DimensionMismatch { expected, actual }) =
            validate_embedding_dim(vector.len(), self.config.dimension)
        {
            return Err(EmbeddingError::DimensionMismatch { expected, actual });
        }

        Ok(vector)
    }

    /// Writes the full snapshot. Concurrent flushes are serialized.
    pub async fn flush(&self) -> CacheResult<()> {
        let _guard = self.persist_lock.lock().await;

        let entries: Vec<SnapshotEntry> = self
            .entries
            .iter()
            .map(|(key, vector)| SnapshotEntry {
                key: *key,
                vector: vector.as_ref().clone(),
            })
            .collect();
        let count = entries.len();
        let snapshot = CacheSnapshot::new(self.config.dimension, entries);
        let path = self.config.path.clone();

        tokio::task::spawn_blocking(move || snapshot.write_to(&path))
            .await
            .map_err(|e| CacheError::Task(e.to_string()))??;

        debug!(entries = count, "Embedding snapshot written");
        Ok(())
    }

    /// Flushes the snapshot. Call once on shutdown.
    pub async fn close(&self) -> CacheResult<()> {
        self.entries.run_pending_tasks().await;
        self.flush().await?;
        info!(path = %self.config.path.display(), "Embedding cache closed");
        Ok(())
    }

    pub async fn stats(&self) -> CacheStats {
        self.entries.run_pending_tasks().await;
        CacheStats {
            entry_count: self.entries.entry_count(),
            client_calls: self.client_calls.load(Ordering::Relaxed),
        }
    }

    pub fn embedder_mode(&self) -> EmbedderMode {
        self.client.mode()
    }

    pub fn dimension(&self) -> usize {
        self.config.dimension
    }

    pub fn config(&self) -> &EmbeddingCacheConfig {
        &self.config
    }
}
