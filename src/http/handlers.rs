//! HTTP request handlers for the Strata API
//!
//! One handler per route: health, stats, query, run-index, clear-rag
//! and file-chunks.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

use crate::core::error::StrataError;
use crate::core::services::Services;
use crate::core::types::*;

/// Health check handler
///
/// Returns server status and version information.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Statistics over the live generation
///
/// Always 200; a read failure is reported as `{"error": ...}`.
pub async fn stats_handler(State(services): State<Arc<Services>>) -> Json<StatsReport> {
    Json(services.stats())
}

/// Answer a question
///
/// # Errors
///
/// - `InvalidQuery`: the question is blank (400)
/// - `Embedding` / `Completion`: a model call failed (500)
pub async fn query_handler(
    State(services): State<Arc<Services>>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, StrataError> {
    if req.question.trim().is_empty() {
        return Err(StrataError::InvalidQuery(
            "Question cannot be empty".to_string(),
        ));
    }

    let answer = services.answer(&req.question).await.inspect_err(|e| {
        if e.is_upstream() {
            tracing::error!("Model service failure: {}", e);
        }
    })?;

    Ok(Json(QueryResponse { answer }))
}

/// Rebuild the index from the configured document root
pub async fn run_index_handler(State(services): State<Arc<Services>>) -> Json<RunIndexResponse> {
    let report = services.run_indexing().await;
    Json(RunIndexResponse::from(report))
}

/// Delete every generation
pub async fn clear_handler(State(services): State<Arc<Services>>) -> Json<ClearResponse> {
    let outcome = services.clear_all().await;
    Json(ClearResponse::from(outcome))
}

/// Chunk texts recorded for one source path
pub async fn file_chunks_handler(
    State(services): State<Arc<Services>>,
    Query(query): Query<FileChunksQuery>,
) -> Json<FileChunksResponse> {
    Json(FileChunksResponse::from(services.chunks_for(&query.path)))
}
