//! Test server harness.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use semgate::backend::{MockSearchBackend, SearchBackend};
use semgate::cache::{EmbeddingCache, EmbeddingCacheConfig};
use semgate::config::DeploymentConfig;
use semgate::embedding::{EmbeddingClient, MockEmbeddingClient};
use semgate::gateway::{GatewayState, create_router_with_state};
use semgate::service::SearchService;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::fixtures::{TEST_DIM, books_deployment, machine_learning_books};

pub struct TestServerConfig {
    pub deployment: DeploymentConfig,
    /// Defaults to a [`MockSearchBackend`] returning two books.
    pub backend: Option<Arc<dyn SearchBackend>>,
    pub embedder: MockEmbeddingClient,
    /// Defaults to a fresh temp directory.
    pub cache_dir: Option<PathBuf>,
    pub backend_timeout: Duration,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            deployment: books_deployment(),
            backend: None,
            embedder: MockEmbeddingClient::new(TEST_DIM),
            cache_dir: None,
            backend_timeout: Duration::from_secs(2),
        }
    }
}

impl TestServerConfig {
    pub fn backend(mut self, backend: Arc<dyn SearchBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn embedder(mut self, embedder: MockEmbeddingClient) -> Self {
        self.embedder = embedder;
        self
    }

    pub fn cache_dir(mut self, dir: PathBuf) -> Self {
        self.cache_dir = Some(dir);
        self
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub embedder: Arc<MockEmbeddingClient>,
    pub cache: Arc<EmbeddingCache>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _temp_dir: Option<TempDir>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stops the server and persists the cache.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = self.cache.close().await;
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

/// Spawns a gateway on an ephemeral port with a mock embedder and (by default) a mock backend.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;

    let (cache_dir, temp_dir) = match config.cache_dir {
        Some(dir) => (dir, None),
        None => {
            let temp_dir =
                TempDir::new().map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
            (temp_dir.path().to_path_buf(), Some(temp_dir))
        }
    };

    let embedder = Arc::new(config.embedder);
    let client: Arc<dyn EmbeddingClient> = embedder.clone();
    let cache = EmbeddingCache::open(
        EmbeddingCacheConfig::new(cache_dir.join("embeddings.rkyv"), TEST_DIM),
        client,
    )
    .await
    .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    let cache = Arc::new(cache);

    let backend = config
        .backend
        .unwrap_or_else(|| Arc::new(MockSearchBackend::new(machine_learning_books())));

    let service = SearchService::new(
        Arc::new(config.deployment),
        Arc::clone(&cache),
        backend,
        config.backend_timeout,
    );
    let app = create_router_with_state(GatewayState::new(Arc::new(service)));

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server_handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    Ok(TestServer {
        addr,
        embedder,
        cache,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
        _temp_dir: temp_dir,
    })
}
