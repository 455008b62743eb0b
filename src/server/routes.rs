//! Router configuration for the API server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Document analysis
        .route("/api/pdf/analyze", post(handlers::analyze_document))
        .route("/api/pdf/sample", get(handlers::sample_document))
        // Entities
        .route("/api/entities/extract", post(handlers::extract_entities))
        // Backend status
        .route("/api/models", get(handlers::list_models))
        .route("/api/status", get(handlers::api_status))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
