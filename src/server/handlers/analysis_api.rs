//! Document analysis endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::AppState;
use super::helpers::{error_response, rejection_response};
use crate::services::analysis::{ParsedAnalysis, SummaryAnalysis};
use crate::services::annotation::Alert;
use crate::services::{AnalysisOutcome, SAMPLE_CONTRACT};

/// Analysis request. Sampling fields override the configured defaults.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default, alias = "pdfContent")]
    pub pdf_content: String,
    pub question: Option<String>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Analysis response.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub request_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub model: String,
    /// Canonical markdown analysis.
    pub formatted_response: String,
    /// Document with annotation blocks.
    pub improved_document: String,
    /// Raw summary reply (empty when the summary call failed).
    pub summary: String,
    pub analysis: ParsedAnalysis,
    pub summary_sections: SummaryAnalysis,
    pub alerts: Vec<Alert>,
}

impl From<AnalysisOutcome> for AnalyzeResponse {
    fn from(outcome: AnalysisOutcome) -> Self {
        Self {
            request_id: outcome.request_id,
            analyzed_at: outcome.analyzed_at,
            model: outcome.model,
            formatted_response: outcome.formatted_analysis,
            improved_document: outcome.annotated_document.text,
            summary: outcome.summary_raw,
            analysis: outcome.analysis,
            summary_sections: outcome.summary,
            alerts: outcome.alerts,
        }
    }
}

/// Analyse a document and return the annotated copy.
pub async fn analyze_document(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };

    let mut options = state.service.default_options();
    if let Some(t) = body.temperature {
        options.temperature = t;
    }
    if let Some(p) = body.top_p {
        options.top_p = p;
    }
    if let Some(n) = body.max_tokens {
        options.max_tokens = n;
    }

    match state
        .service
        .analyze(&body.pdf_content, body.question.as_deref(), options)
        .await
    {
        Ok(outcome) => Json(AnalyzeResponse::from(outcome)).into_response(),
        Err(e) if e.is_input_error() => {
            error_response(&e, "Se requiere el contenido del documento")
        }
        Err(e) => error_response(&e, "La solicitud de análisis al modelo falló"),
    }
}

/// Stand-in for PDF text extraction: returns the bundled sample contract.
pub async fn sample_document() -> impl IntoResponse {
    Json(serde_json::json!({ "text": SAMPLE_CONTRACT }))
}
