//! Analysis records and pipeline errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::llm::LlmError;
use crate::services::annotation::{Alert, AnnotatedDocument};
use crate::services::ner::EntityError;

/// Title used when the model reply carries no `# Análisis del ...` heading.
pub const DEFAULT_TITLE: &str = "Análisis de Documento";

/// Sections recovered from the structured analysis reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAnalysis {
    pub title: String,
    pub introduction: String,
    pub details: String,
    pub conclusion: String,
    /// Canonical markdown rendering of the four fields, always in the same order.
    pub full_response: String,
}

impl ParsedAnalysis {
    pub fn new(
        title: impl Into<String>,
        introduction: impl Into<String>,
        details: impl Into<String>,
        conclusion: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let introduction = introduction.into();
        let details = details.into();
        let conclusion = conclusion.into();
        let full_response = format!(
            "\n# {}\n\n## Introducción\n{}\n\n## Detalles\n{}\n\n## Conclusión\n{}\n",
            title, introduction, details, conclusion
        );
        Self {
            title,
            introduction,
            details,
            conclusion,
            full_response,
        }
    }
}

impl Default for ParsedAnalysis {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, "", "", "")
    }
}

/// Sections recovered from the summary-with-suggestions reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryAnalysis {
    pub summary: String,
    pub suggestions: String,
    pub critical_points: String,
}

impl SummaryAnalysis {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.suggestions.is_empty() && self.critical_points.is_empty()
    }
}

/// Everything one analysis request produces.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub request_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub model: String,
    pub analysis: ParsedAnalysis,
    /// Same text as `analysis.full_response`.
    pub formatted_analysis: String,
    pub summary: SummaryAnalysis,
    /// Unparsed summary reply; empty when the summary call failed.
    pub summary_raw: String,
    pub annotated_document: AnnotatedDocument,
    pub alerts: Vec<Alert>,
}

/// Errors from the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No document text provided")]
    EmptyDocument,

    #[error("LLM request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Entity extraction failed: {0}")]
    Entities(#[from] EntityError),
}

impl AnalysisError {
    /// Caller mistakes, reported before any upstream call is made.
    pub fn is_input_error(&self) -> bool {
        matches!(self, AnalysisError::EmptyDocument)
    }

    /// HTTP status returned by the failing upstream service, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AnalysisError::EmptyDocument => None,
            AnalysisError::Llm(e) => e.status(),
            AnalysisError::Entities(e) => e.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_response_is_canonical() {
        let parsed = ParsedAnalysis::new("Análisis del Contrato", "Intro.", "Det.", "Fin.");
        assert_eq!(
            parsed.full_response,
            "\n# Análisis del Contrato\n\n## Introducción\nIntro.\n\n## Detalles\nDet.\n\n## Conclusión\nFin.\n"
        );
    }

    #[test]
    fn default_uses_generic_title() {
        let parsed = ParsedAnalysis::default();
        assert_eq!(parsed.title, DEFAULT_TITLE);
        assert!(parsed.introduction.is_empty());
        assert!(parsed.full_response.contains("## Conclusión\n"));
    }

    #[test]
    fn error_classification() {
        assert!(AnalysisError::EmptyDocument.is_input_error());
        assert_eq!(AnalysisError::EmptyDocument.upstream_status(), None);

        let upstream = AnalysisError::from(LlmError::Api {
            status: 503,
            body: "busy".into(),
        });
        assert!(!upstream.is_input_error());
        assert_eq!(upstream.upstream_status(), Some(503));
    }
}
