//! Entity extraction endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::super::AppState;
use super::helpers::{error_response, rejection_response};

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub text: String,
}

/// Extract entities and return them with correlated rows.
pub async fn extract_entities(
    State(state): State<AppState>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };

    match state.service.extract_entities(&body.text).await {
        Ok(table) => Json(table).into_response(),
        Err(e) if e.is_input_error() => {
            error_response(&e, "Se requiere el texto para el análisis")
        }
        Err(e) => error_response(&e, "Error en la extracción de entidades"),
    }
}
