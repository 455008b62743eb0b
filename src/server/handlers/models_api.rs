//! Model listing and service status.

use axum::{extract::State, response::IntoResponse, Json};

use super::super::AppState;
use super::helpers::error_response;
use crate::services::AnalysisError;

/// Models installed on the LLM backend.
pub async fn list_models(State(state): State<AppState>) -> impl IntoResponse {
    match state.service.model().list_models().await {
        Ok(models) => Json(serde_json::json!({ "models": models })).into_response(),
        Err(e) => error_response(&AnalysisError::from(e), "No se pudieron listar los modelos"),
    }
}

/// Backend reachability and active configuration.
pub async fn api_status(State(state): State<AppState>) -> impl IntoResponse {
    let model = state.service.model();
    Json(serde_json::json!({
        "llm_available": model.is_available().await,
        "model": model.model_name(),
        "endpoint": state.llm_endpoint.as_str(),
        "entity_backend": state.service.extractor().backend_id(),
    }))
}
