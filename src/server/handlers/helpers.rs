//! Shared helpers for JSON handlers.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::llm::LlmError;
use crate::services::ner::EntityError;
use crate::services::AnalysisError;

/// HTTP status for a pipeline error.
///
/// Input errors are 400. Upstream errors reuse the upstream status when it
/// is an error status, otherwise 502. A disabled model is 503.
pub fn status_for(err: &AnalysisError) -> StatusCode {
    if err.is_input_error() {
        return StatusCode::BAD_REQUEST;
    }
    if matches!(err, AnalysisError::Llm(LlmError::Disabled)) {
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    err.upstream_status()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .filter(|code| code.is_client_error() || code.is_server_error())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

/// Raw upstream body when the service answered, otherwise the error text.
fn details_for(err: &AnalysisError) -> String {
    match err {
        AnalysisError::Llm(LlmError::Api { body, .. })
        | AnalysisError::Entities(EntityError::Api { body, .. }) => body.clone(),
        other => other.to_string(),
    }
}

/// JSON error body `{ "error": ..., "details": ... }` with the mapped status.
pub fn error_response(err: &AnalysisError, message: &str) -> Response {
    let status = status_for(err);
    if err.is_input_error() {
        tracing::debug!("Rejected request: {}", err);
        return (status, Json(serde_json::json!({ "error": message }))).into_response();
    }

    tracing::warn!("{}: {}", message, err);
    (
        status,
        Json(serde_json::json!({
            "error": message,
            "details": details_for(err),
        })),
    )
        .into_response()
}

/// JSON error body for a request body axum could not decode.
pub fn rejection_response(rejection: JsonRejection) -> Response {
    let status = rejection.status();
    tracing::debug!("Rejected request body: {}", rejection.body_text());
    (
        status,
        Json(serde_json::json!({
            "error": "Cuerpo de la solicitud no válido",
            "details": rejection.body_text(),
        })),
    )
        .into_response()
}
