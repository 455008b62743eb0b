//! Shared helper functions for CLI commands.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use certylex::config::Config;
use certylex::llm::LlmClient;
use certylex::services::{AnalysisService, DocumentSource};

/// Spinner shown while waiting on a backend.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Build the analysis service from configuration.
pub fn build_service(config: &Config) -> AnalysisService {
    AnalysisService::new(
        Arc::new(LlmClient::new(config.llm.clone())),
        config.entities.build(),
        config.llm.sampling(),
        config.llm.summary_max_tokens,
    )
}

/// Load document text from a file, or the sample contract when `sample` is set.
pub async fn load_document(file: Option<&Path>, sample: bool) -> anyhow::Result<String> {
    let source = match (file, sample) {
        (_, true) => DocumentSource::Sample,
        (Some(path), false) => DocumentSource::from_path(Some(path)),
        (None, false) => anyhow::bail!("No document given: pass a FILE or --sample"),
    };
    Ok(source.load().await?)
}
