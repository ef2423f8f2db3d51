//! JSON API tests, driving the router in-process

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use warmpath::http::router;
use warmpath::*;

fn state() -> Arc<AppState> {
    let graph = InMemoryGraph::from_parts(
        vec![
            Entity::person("alice", "Alice").internal_owner(),
            Entity::organization("acme", "Acme").portfolio(),
            Entity::organization("target", "Target Co").pipeline(),
        ],
        vec![
            Edge::new("alice", "acme", EdgeKind::OWNER, 0.9),
            Edge::new("acme", "target", EdgeKind::PORTFOLIO_CONNECTION, 0.5),
            Edge::new("alice", "target", EdgeKind::LINKEDIN_INDUSTRY_CONNECTION, 0.3),
        ],
    )
    .unwrap();
    Arc::new(AppState::new(graph, PathfindingConfig::default()))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = router(state()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_paths_endpoint() {
    let (status, body) = send(post(
        "/api/paths",
        json!({ "sources": ["alice"], "target": "target" }),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    let paths = body["paths"].as_array().unwrap();
    assert_eq!(paths.len(), 2);
    assert_eq!(paths[0]["path"][0]["id"], "alice");
    assert_eq!(paths[0]["path"][1]["name"], "Acme");
    assert_eq!(paths[0]["path"][1]["type"], "organization");
    assert_eq!(paths[0]["length"], 2);
    assert_eq!(paths[1]["length"], 1);
    assert_eq!(body["truncated"], false);
}

#[tokio::test]
async fn test_paths_endpoint_overrides() {
    let (status, body) = send(post(
        "/api/paths",
        json!({ "sources": ["alice"], "target": "target", "max_hops": 1, "max_results": 5 }),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    let paths = body["paths"].as_array().unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0]["kinds"], json!(["linkedin_industry_connection"]));
}

#[tokio::test]
async fn test_invalid_arguments_are_bad_requests() {
    let (status, body) = send(post(
        "/api/paths",
        json!({ "sources": ["alice"], "target": "target", "max_hops": 0 }),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("max_hops"));

    let (status, _) = send(post("/api/paths", json!({ "sources": [], "target": "target" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(post(
        "/api/paths",
        json!({ "sources": ["alice"], "target": "target", "min_strength": 1.5 }),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_no_path_is_empty_ok() {
    let (status, body) = send(post(
        "/api/paths",
        json!({ "sources": ["target"], "target": "alice" }),
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paths"], json!([]));
}

#[tokio::test]
async fn test_warm_intros_endpoints() {
    let (status, body) = send(post("/api/warm-intros", json!({ "target": "target" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["target"], "target");
    assert_eq!(body["paths"].as_array().unwrap().len(), 2);

    let (status, body) = send(post(
        "/api/warm-intros/batch",
        json!({ "targets": ["target", "acme"] }),
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["status"], "completed");
    assert_eq!(body["job"]["total"], 2);
    assert_eq!(body["job"]["paths_found"], 3);
    assert_eq!(body["results"][1]["target"], "acme");
}

#[tokio::test]
async fn test_status_endpoint() {
    let request = Request::builder()
        .uri("/api/status")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], warmpath::VERSION);
    assert_eq!(body["graph"]["edge_count"], 3);
    assert_eq!(body["graph"]["internal_owner_count"], 1);
    assert_eq!(body["pathfinding"]["max_hops"], 3);
}
