//! HTTP server implementation for the warm-introduction API

use axum::{
    routing::{get, post},
    Router,
};
use crate::config::ServerConfig;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use super::handler::{batch_handler, paths_handler, status_handler, warm_intros_handler, AppState};

/// Build the API router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/paths", post(paths_handler))
        .route("/api/warm-intros", post(warm_intros_handler))
        .route("/api/warm-intros/batch", post(batch_handler))
        .route("/api/status", get(status_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// HTTP server serving path searches over a loaded graph
pub struct HttpServer {
    state: Arc<AppState>,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(state: Arc<AppState>, config: ServerConfig) -> Self {
        Self { state, config }
    }

    /// Start the HTTP server
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        let app = router(Arc::clone(&self.state));

        let addr = format!("{}:{}", self.config.address, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("Warm-introduction API listening on http://{}", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}
