//! semgate HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use semgate::backend::{SearchBackend, SolrClient};
use semgate::cache::{EmbeddingCache, EmbeddingCacheConfig};
use semgate::config::{Config, DeploymentConfig};
use semgate::embedding::{EmbeddingClient, HttpEmbeddingClient, StubEmbeddingClient};
use semgate::gateway::{GatewayState, create_router_with_state};
use semgate::service::SearchService;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        solr_url = %config.solr_url,
        "semgate starting"
    );

    let deployment = Arc::new(DeploymentConfig::load(&config.deployment_path)?);
    tracing::info!(
        collection = %deployment.collection,
        vector_fields = deployment.vector_fields.len(),
        "Deployment loaded"
    );

    let embedder: Arc<dyn EmbeddingClient> = match &config.embedding_url {
        Some(url) => Arc::new(HttpEmbeddingClient::new(url.clone())),
        None => {
            tracing::warn!("No SEMGATE_EMBEDDING_URL configured, running embedder in stub mode");
            Arc::new(StubEmbeddingClient::new(config.embedding_dim))
        }
    };

    let cache = Arc::new(EmbeddingCache::open(EmbeddingCacheConfig::from(&config), embedder).await?);
    let backend: Arc<dyn SearchBackend> =
        Arc::new(SolrClient::new(config.solr_url.clone(), deployment.id_field.clone()));

    let service = Arc::new(SearchService::new(
        deployment,
        Arc::clone(&cache),
        backend,
        config.backend_timeout,
    ));

    let app = create_router_with_state(GatewayState::new(service));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Persisting embedding cache...");
    if let Err(e) = cache.close().await {
        tracing::error!("Failed to persist embedding cache: {}", e);
    }

    tracing::info!("semgate shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("SEMGATE_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
