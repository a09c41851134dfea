//! HTTP REST adapter
//!
//! Depends only on core/. Exposes the service operations as JSON
//! endpoints via the Axum web framework.

pub mod error;
pub mod handlers;
pub mod middleware;

pub use handlers::*;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::core::services::Services;

/// Build the API router with logging and CORS layers
pub fn router(services: Arc<Services>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/query", post(query_handler))
        .route("/run-index", post(run_index_handler))
        .route("/clear-rag", post(clear_handler))
        .route("/file-chunks", get(file_chunks_handler))
        .layer(axum_middleware::from_fn(middleware::log_request))
        .layer(CorsLayer::permissive())
        .with_state(services)
}
