//! Document analysis pipeline.
//!
//! Prompts the model for a structured analysis and a summary, parses both
//! replies, annotates the document and extracts the inserted blocks as alerts.
//! Entity extraction runs independently of the model calls.

mod parser;
mod types;

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::llm::prompts::{build_analysis_prompt, build_summary_prompt};
use crate::llm::{LanguageModel, SamplingOptions};
use crate::services::annotation::{annotate, extract_alerts, Document};
use crate::services::entities::EntityTable;
use crate::services::ner::EntityExtractor;

pub use parser::{parse_analysis, parse_summary};
pub use types::{AnalysisError, AnalysisOutcome, ParsedAnalysis, SummaryAnalysis, DEFAULT_TITLE};

/// Service running the review pipeline against a model and an entity backend.
pub struct AnalysisService {
    model: Arc<dyn LanguageModel>,
    extractor: Arc<dyn EntityExtractor>,
    defaults: SamplingOptions,
    summary_max_tokens: u32,
}

impl AnalysisService {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        extractor: Arc<dyn EntityExtractor>,
        defaults: SamplingOptions,
        summary_max_tokens: u32,
    ) -> Self {
        Self {
            model,
            extractor,
            defaults,
            summary_max_tokens,
        }
    }

    pub fn model(&self) -> &dyn LanguageModel {
        self.model.as_ref()
    }

    pub fn extractor(&self) -> &dyn EntityExtractor {
        self.extractor.as_ref()
    }

    /// Sampling options used when a request does not override them.
    pub fn default_options(&self) -> SamplingOptions {
        self.defaults
    }

    /// Analyse and annotate a document.
    ///
    /// A failed analysis call fails the request. A failed summary call is
    /// logged and the pipeline continues with empty summary fields.
    pub async fn analyze(
        &self,
        text: &str,
        question: Option<&str>,
        options: SamplingOptions,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let document = Document::parse(text)?;
        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            model = self.model.model_name(),
            document_chars = document.text().len(),
            "Analyzing document"
        );

        let prompt = build_analysis_prompt(document.text(), question);
        let reply = self.model.complete(&prompt, &options).await?;
        debug!(%request_id, reply_chars = reply.len(), "Received analysis reply");
        let analysis = parse_analysis(&reply);

        let summary_prompt = build_summary_prompt(document.text());
        let summary_options = options.for_summary(self.summary_max_tokens);
        let summary_raw = match self.model.complete(&summary_prompt, &summary_options).await {
            Ok(reply) => {
                debug!(%request_id, reply_chars = reply.len(), "Received summary reply");
                reply
            }
            Err(e) => {
                warn!(%request_id, error = %e, "Summary request failed, continuing without it");
                String::new()
            }
        };
        let summary = parse_summary(&summary_raw);

        let annotated_document = annotate(&document, &analysis, &summary);
        let alerts = extract_alerts(&annotated_document.text);
        info!(
            %request_id,
            blocks = annotated_document.blocks.len(),
            "Document annotated"
        );

        Ok(AnalysisOutcome {
            request_id,
            analyzed_at: Utc::now(),
            model: self.model.model_name().to_string(),
            formatted_analysis: analysis.full_response.clone(),
            analysis,
            summary,
            summary_raw,
            annotated_document,
            alerts,
        })
    }

    /// Extract entities and pair names with personal IDs.
    pub async fn extract_entities(&self, text: &str) -> Result<EntityTable, AnalysisError> {
        let document = Document::parse(text)?;
        let entities = self.extractor.extract(document.text()).await?;
        info!(
            backend = self.extractor.backend_id(),
            names = entities.names.len(),
            personal_ids = entities.personal_ids.len(),
            company_ids = entities.company_ids.len(),
            "Entities extracted"
        );
        Ok(EntityTable::from(entities))
    }

    /// Run analysis and entity extraction concurrently. Each result is
    /// independent; one failing does not cancel the other.
    pub async fn review(
        &self,
        text: &str,
        question: Option<&str>,
        options: SamplingOptions,
    ) -> (
        Result<AnalysisOutcome, AnalysisError>,
        Result<EntityTable, AnalysisError>,
    ) {
        tokio::join!(
            self.analyze(text, question, options),
            self.extract_entities(text)
        )
    }
}
