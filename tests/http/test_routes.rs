//! Route shapes of the REST API
//!
//! Tests the complete workflow: index, query, stats, file chunks, clear.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt as TowerServiceExt;

use crate::common::fixtures::services_with;
use crate::common::{create_test_services, FailingCompleter, TestRepo, TestServices};
use strata::http;

fn app(ts: &TestServices) -> Router {
    http::router(Arc::clone(&ts.services))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let repo = TestRepo::empty();
    let ts = create_test_services(repo.path());

    let (status, body) = send(app(&ts), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_run_index_success() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());

    let (status, body) = send(app(&ts), post_empty("/run-index")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Indexing complete");
    assert!(body["count"].as_u64().unwrap() > 0);
    assert!(body["debug"].is_array());
}

#[tokio::test]
async fn test_run_index_empty_tree_is_error_shape() {
    let repo = TestRepo::empty();
    let ts = create_test_services(repo.path());

    let (status, body) = send(app(&ts), post_empty("/run-index")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("No chunks produced"));
    assert!(body.get("count").is_none());
}

#[tokio::test]
async fn test_query_answers() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    let (status, body) = send(
        app(&ts),
        post("/query", json!({"question": "What does AccountController do?"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["answer"]
        .as_str()
        .unwrap()
        .contains("class AccountController"));
}

#[tokio::test]
async fn test_query_blank_question_is_bad_request() {
    let repo = TestRepo::empty();
    let ts = create_test_services(repo.path());

    let (status, body) = send(app(&ts), post("/query", json!({"question": "  "}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["error"], "Invalid query: Question cannot be empty");
    assert!(ts.completer.prompts().is_empty());
}

#[tokio::test]
async fn test_query_completion_failure_is_server_error() {
    let repo = TestRepo::empty();
    let (services, _storage) = services_with(repo.path(), Arc::new(FailingCompleter));

    let (status, body) = send(
        http::router(services),
        post("/query", json!({"question": "Is the model up?"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("connection refused"));
}

#[tokio::test]
async fn test_query_missing_field_is_rejected() {
    let repo = TestRepo::empty();
    let ts = create_test_services(repo.path());

    let response = app(&ts)
        .oneshot(post("/query", json!({"q": "wrong field"})))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_stats_route() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    let (status, body) = send(app(&ts), get("/stats")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_files"], 4);
    assert!(body["total_chunks"].as_u64().unwrap() > 0);
    assert_eq!(body["files"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_file_chunks_route() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    let (status, body) = send(
        app(&ts),
        get("/file-chunks?path=web/AccountController.java"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["count"].as_u64().unwrap() >= 1);
    assert!(body.get("message").is_none());

    let (_, missing) = send(app(&ts), get("/file-chunks?path=Nope.java")).await;
    assert_eq!(missing["count"], 0);
    assert_eq!(missing["message"], "No chunks found for this path.");
}

#[tokio::test]
async fn test_clear_route_then_stats() {
    let repo = TestRepo::spring_app();
    let ts = create_test_services(repo.path());
    ts.services.run_indexing().await;

    let (status, body) = send(app(&ts), post_empty("/clear-rag")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let (_, stats) = send(app(&ts), get("/stats")).await;
    assert_eq!(stats["total_chunks"], 0);
    assert_eq!(stats["average_chunk_size"], 0);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let repo = TestRepo::empty();
    let ts = create_test_services(repo.path());

    let response = app(&ts).oneshot(get("/api/v1/search")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
