//! Named entity extraction for Spanish legal documents.
//!
//! Provides an `EntityExtractor` trait with two backends: a remote NLP service
//! reached over HTTP, and a built-in `RegexEntityExtractor` that needs no
//! external service.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Entities found in a document, each list in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    /// Person names.
    pub names: Vec<String>,
    /// National identity numbers (DNI / NIE).
    pub personal_ids: Vec<String>,
    /// Company tax identifiers (CIF).
    pub company_ids: Vec<String>,
}

/// Trait for pluggable entity extraction backends.
#[async_trait]
pub trait EntityExtractor: Send + Sync {
    /// Backend identifier (e.g. "remote", "regex").
    fn backend_id(&self) -> &str;

    /// Extract entities from document text.
    async fn extract(&self, text: &str) -> Result<ExtractedEntities, EntityError>;
}

/// Errors from an entity extraction backend.
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl EntityError {
    pub fn status(&self) -> Option<u16> {
        match self {
            EntityError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Which extractor to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityBackend {
    /// External NLP service.
    #[default]
    Remote,
    /// Built-in patterns.
    Regex,
}

impl std::str::FromStr for EntityBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "remote" => Ok(EntityBackend::Remote),
            "regex" => Ok(EntityBackend::Regex),
            other => Err(format!("unknown entity backend: {}", other)),
        }
    }
}

/// Entity extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityConfig {
    #[serde(default)]
    pub backend: EntityBackend,

    /// Base URL of the remote NLP service.
    #[serde(default = "default_service_url")]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_service_url() -> String {
    "http://localhost:5328".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl EntityConfig {
    pub fn base_default() -> Self {
        Self {
            backend: EntityBackend::default(),
            endpoint: default_service_url(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Apply `ENTITY_BACKEND` and `ENTITY_SERVICE_URL` (or `BACKEND_API_URL`).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("ENTITY_BACKEND") {
            if let Ok(backend) = val.parse() {
                self.backend = backend;
            }
        }
        if let Ok(val) =
            std::env::var("ENTITY_SERVICE_URL").or_else(|_| std::env::var("BACKEND_API_URL"))
        {
            self.endpoint = val.trim_end_matches('/').to_string();
        }
        self
    }

    /// Build the configured extractor.
    pub fn build(&self) -> Arc<dyn EntityExtractor> {
        match self.backend {
            EntityBackend::Remote => Arc::new(RemoteEntityExtractor::new(
                &self.endpoint,
                Duration::from_secs(self.timeout_secs),
            )),
            EntityBackend::Regex => Arc::new(RegexEntityExtractor::new()),
        }
    }
}

// ============================================================================
// RemoteEntityExtractor
// ============================================================================

/// Client for the NLP entity service (`POST /api/nlp_entities/extract`).
pub struct RemoteEntityExtractor {
    endpoint: String,
    client: Client,
}

#[derive(Serialize)]
struct ExtractRequest<'a> {
    text: &'a str,
}

/// Wire format of the NLP service reply.
#[derive(Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    nombres: Vec<String>,
    #[serde(default)]
    nifs: Vec<String>,
    #[serde(default)]
    nif_empresa: Vec<String>,
}

impl From<ExtractResponse> for ExtractedEntities {
    fn from(resp: ExtractResponse) -> Self {
        Self {
            names: resp.nombres,
            personal_ids: resp.nifs,
            company_ids: resp.nif_empresa,
        }
    }
}

impl RemoteEntityExtractor {
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl EntityExtractor for RemoteEntityExtractor {
    fn backend_id(&self) -> &str {
        "remote"
    }

    async fn extract(&self, text: &str) -> Result<ExtractedEntities, EntityError> {
        let url = format!("{}/api/nlp_entities/extract", self.endpoint);
        debug!(url = %url, text_chars = text.len(), "requesting entity extraction");

        let resp = self
            .client
            .post(&url)
            .json(&ExtractRequest { text })
            .send()
            .await
            .map_err(|e| EntityError::Connection(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EntityError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ExtractResponse = resp
            .json()
            .await
            .map_err(|e| EntityError::Parse(e.to_string()))?;

        Ok(parsed.into())
    }
}

// ============================================================================
// RegexEntityExtractor
// ============================================================================

/// Pattern-based extractor for Spanish contracts.
///
/// Names are taken from honorific-prefixed sequences (`DON`, `DOÑA`, `D.`,
/// `Sr.`, `Sra.`) of two to five capitalised words. Personal IDs are DNI and
/// NIE numbers; company IDs are CIF codes.
pub struct RegexEntityExtractor;

impl RegexEntityExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous extraction; the trait impl delegates here.
    pub fn extract_sync(&self, text: &str) -> ExtractedEntities {
        ExtractedEntities {
            names: collect_unique(&HONORIFIC_NAME, text),
            personal_ids: collect_unique(&PERSONAL_ID, text),
            company_ids: collect_unique(&COMPANY_ID, text),
        }
    }
}

impl Default for RegexEntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityExtractor for RegexEntityExtractor {
    fn backend_id(&self) -> &str {
        "regex"
    }

    async fn extract(&self, text: &str) -> Result<ExtractedEntities, EntityError> {
        Ok(self.extract_sync(text))
    }
}

static HONORIFIC_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:DOÑA|DON|Doña|Don|Dña\.|Sra\.|Sr\.|D\.)[ \t]+(?:[A-ZÁÉÍÓÚÑ][a-záéíóúñü]+|[A-ZÁÉÍÓÚÑ]{2,})(?:[ \t]+(?:[A-ZÁÉÍÓÚÑ][a-záéíóúñü]+|[A-ZÁÉÍÓÚÑ]{2,})){1,4}",
    )
    .expect("honorific name pattern should compile")
});

/// DNI (8 digits + letter) or NIE (X/Y/Z + 7 digits + letter).
static PERSONAL_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{8}|[XYZ]\d{7})[A-HJ-NP-TV-Z]\b")
        .expect("personal id pattern should compile")
});

/// CIF: organisation letter + 7 digits + control digit or letter.
static COMPANY_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[ABCDEFGHJNPQRSUVW]\d{7}[0-9A-J]\b").expect("company id pattern should compile")
});

/// All matches of `re`, trimmed, de-duplicated, in order of first appearance.
fn collect_unique(re: &Regex, text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    re.find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
