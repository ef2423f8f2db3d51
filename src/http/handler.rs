//! HTTP handlers for the warm-introduction API

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use crate::config::PathfindingConfig;
use crate::graph::{EntityId, InMemoryGraph};
use crate::intro::{IntroError, IntroFinder, IntroResult, JobProgress, JobState, TargetIntros};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{debug, error};

/// Shared state behind every route
#[derive(Debug)]
pub struct AppState {
    pub finder: IntroFinder<InMemoryGraph>,
}

impl AppState {
    pub fn new(graph: InMemoryGraph, config: PathfindingConfig) -> Self {
        Self {
            finder: IntroFinder::new(graph, config),
        }
    }
}

/// Per-request overrides of the configured search parameters
#[derive(Debug, Default, Deserialize)]
pub struct SearchOverrides {
    pub max_hops: Option<usize>,
    pub min_strength: Option<f64>,
    pub max_results: Option<usize>,
    pub bidirectional: Option<bool>,
}

impl SearchOverrides {
    fn apply(&self, base: &PathfindingConfig) -> PathfindingConfig {
        let mut config = base.clone();
        if let Some(max_hops) = self.max_hops {
            config.max_hops = max_hops;
        }
        if let Some(min_strength) = self.min_strength {
            config.min_strength = min_strength;
        }
        if let Some(max_results) = self.max_results {
            config.max_results = max_results;
        }
        if let Some(bidirectional) = self.bidirectional {
            config.bidirectional = bidirectional;
        }
        config
    }
}

/// Request for paths between explicit sources and a target
#[derive(Debug, Deserialize)]
pub struct PathsRequest {
    pub sources: Vec<EntityId>,
    pub target: EntityId,
    #[serde(flatten)]
    pub overrides: SearchOverrides,
}

/// Request for internal-owner paths to one target
#[derive(Debug, Deserialize)]
pub struct WarmIntroRequest {
    pub target: EntityId,
}

/// Request for internal-owner paths to many targets
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub targets: Vec<EntityId>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub job: JobProgress,
    pub results: Vec<TargetIntros>,
}

/// Handler for explicit source/target searches
pub async fn paths_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PathsRequest>,
) -> Response {
    debug!("Path search: {:?} -> {}", payload.sources, payload.target);
    let result = tokio::task::spawn_blocking(move || {
        let config = payload.overrides.apply(state.finder.config());
        state
            .finder
            .find_intro_paths_with(&payload.sources, &payload.target, &config)
    })
    .await;
    into_response(result)
}

/// Handler for internal-owner searches
pub async fn warm_intros_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<WarmIntroRequest>,
) -> Response {
    let result =
        tokio::task::spawn_blocking(move || state.finder.warm_introductions(&payload.target)).await;
    into_response(result)
}

/// Handler for batch internal-owner searches
pub async fn batch_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BatchRequest>,
) -> Response {
    let result = tokio::task::spawn_blocking(move || {
        let job = JobState::new();
        state
            .finder
            .batch_warm_introductions(&payload.targets, &job)
            .map(|results| BatchResponse {
                job: job.snapshot(),
                results,
            })
    })
    .await;
    into_response(result)
}

/// Handler for system status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": crate::VERSION,
        "graph": state.finder.store().statistics(),
        "pathfinding": state.finder.config(),
    }))
}

fn into_response<T: Serialize>(result: Result<IntroResult<T>, JoinError>) -> Response {
    match result {
        Ok(Ok(body)) => Json(body).into_response(),
        Ok(Err(e @ IntroError::InvalidArgument(_))) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response()
        }
        Ok(Err(e)) => {
            error!("Request failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() })))
                .into_response()
        }
        Err(e) => {
            error!("Search task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "search task failed" })),
            )
                .into_response()
        }
    }
}
