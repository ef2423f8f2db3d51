use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};
use warmpath::{AppState, Config, HttpServer, InMemoryGraph};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Warmpath v{}", warmpath::version());

    let mut config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path).with_context(|| format!("loading config {}", path))?,
        None => Config::default(),
    };
    config.apply_env()?;

    let graph = match &config.graph_path {
        Some(path) => InMemoryGraph::load_json_file(path)
            .with_context(|| format!("loading graph {}", path.display()))?,
        None => {
            warn!("No graph_path configured, serving an empty graph");
            InMemoryGraph::new()
        }
    };

    let state = Arc::new(AppState::new(graph, config.pathfinding.clone()));
    let server = HttpServer::new(state, config.server.clone());

    server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))
}
