//! In-process fake Solr for wire-level tests.

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use parking_lot::Mutex;
use tokio::net::TcpListener;

/// One captured `select` call: collection plus decoded form pairs.
#[derive(Debug, Clone)]
pub struct CapturedSelect {
    pub collection: String,
    pub params: Vec<(String, String)>,
}

impl CapturedSelect {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.params
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

#[derive(Clone)]
struct FakeSolrState {
    body: serde_json::Value,
    captured: Arc<Mutex<Vec<CapturedSelect>>>,
}

pub struct FakeSolr {
    pub base_url: String,
    captured: Arc<Mutex<Vec<CapturedSelect>>>,
}

impl FakeSolr {
    /// Starts a server answering every `select` with `body`.
    pub async fn spawn(body: serde_json::Value) -> std::io::Result<Self> {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = FakeSolrState {
            body,
            captured: Arc::clone(&captured),
        };

        let app = Router::new()
            .route("/{collection}/select", post(select))
            .route("/{collection}/admin/ping", get(|| async { StatusCode::OK }))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            captured,
        })
    }

    pub fn selects(&self) -> Vec<CapturedSelect> {
        self.captured.lock().clone()
    }

    pub fn last_select(&self) -> Option<CapturedSelect> {
        self.captured.lock().last().cloned()
    }
}

async fn select(
    State(state): State<FakeSolrState>,
    Path(collection): Path<String>,
    Form(params): Form<Vec<(String, String)>>,
) -> Json<serde_json::Value> {
    state.captured.lock().push(CapturedSelect { collection, params });
    Json(state.body.clone())
}
