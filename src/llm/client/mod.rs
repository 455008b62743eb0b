//! LLM client for legal document analysis.
//!
//! Talks to the Ollama API for local LLM inference.

mod config;
pub mod prompts;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub use config::LlmConfig;

/// Sampling parameters forwarded to the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

/// Extra temperature for the summary prompt so suggestions are a bit more varied.
pub const SUMMARY_TEMPERATURE_BOOST: f32 = 0.1;

impl SamplingOptions {
    /// Options for the summary prompt, derived from the analysis options.
    pub fn for_summary(&self, summary_max_tokens: u32) -> Self {
        Self {
            temperature: self.temperature + SUMMARY_TEMPERATURE_BOOST,
            top_p: self.top_p,
            max_tokens: summary_max_tokens,
        }
    }
}

impl Default for SamplingOptions {
    fn default() -> Self {
        LlmConfig::base_default().sampling()
    }
}

/// A text completion backend.
///
/// `LlmClient` is the production implementation; the analysis service only
/// depends on this trait.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier reported back to callers.
    fn model_name(&self) -> &str;

    /// Complete a prompt and return the fully assembled reply.
    async fn complete(&self, prompt: &str, options: &SamplingOptions) -> Result<String, LlmError>;

    /// List models available on the backend.
    async fn list_models(&self) -> Result<Vec<String>, LlmError>;

    /// Whether the backend is reachable.
    async fn is_available(&self) -> bool;
}

/// LLM client for document processing.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
}

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
}

/// Ollama API response format. In streaming mode every NDJSON line has this shape.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    /// Set when the model fails, including mid-stream.
    #[serde(default)]
    error: Option<String>,
}

impl OllamaResponse {
    /// Turn an in-band `error` into an API error carrying `status`.
    fn into_result(self, status: u16) -> Result<Self, LlmError> {
        match self.error {
            Some(body) => Err(LlmError::Api { status, body }),
            None => Ok(self),
        }
    }
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    pub fn new(config: LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    /// Get the config.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Call Ollama with a prompt, buffered or streamed depending on config.
    async fn call_ollama(&self, prompt: &str, options: &SamplingOptions) -> Result<String, LlmError> {
        if !self.config.enabled {
            return Err(LlmError::Disabled);
        }

        let request = OllamaRequest {
            model: &self.config.model,
            prompt,
            stream: self.config.stream,
            options: OllamaOptions {
                temperature: options.temperature,
                top_p: options.top_p,
                num_predict: options.max_tokens,
            },
        };

        let url = format!("{}/api/generate", self.config.endpoint);
        debug!(
            model = %self.config.model,
            prompt_chars = prompt.len(),
            stream = self.config.stream,
            "sending prompt to Ollama"
        );

        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        if self.config.stream {
            return read_stream(resp, status.as_u16()).await;
        }

        let ollama_resp: OllamaResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        Ok(ollama_resp.into_result(status.as_u16())?.response)
    }
}

/// Assemble an NDJSON token stream into the complete reply.
///
/// Lines can be split across network chunks, so bytes are buffered until a
/// newline arrives. Reading stops at the first line with `done: true`. An
/// `error` line, or a body that closes before `done`, fails the call.
async fn read_stream(mut resp: reqwest::Response, status: u16) -> Result<String, LlmError> {
    let mut pending: Vec<u8> = Vec::new();
    let mut reply = String::new();
    let mut chunks = 0usize;

    while let Some(bytes) = resp
        .chunk()
        .await
        .map_err(|e| LlmError::Connection(e.to_string()))?
    {
        pending.extend_from_slice(&bytes);
        while let Some(pos) = pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = pending.drain(..=pos).collect();
            chunks += 1;
            if append_stream_line(&line, status, &mut reply)? {
                debug!(chunks, reply_chars = reply.len(), "stream complete");
                return Ok(reply);
            }
        }
    }

    // Trailing line without a newline terminator.
    if append_stream_line(&pending, status, &mut reply)? {
        debug!(chunks, reply_chars = reply.len(), "stream complete");
        return Ok(reply);
    }

    warn!(chunks, reply_chars = reply.len(), "stream closed before done");
    Err(LlmError::Parse(format!(
        "stream ended before done after {} chars",
        reply.len()
    )))
}

/// Decode one NDJSON line into `reply`. Returns true once the model reports `done`.
fn append_stream_line(line: &[u8], status: u16, reply: &mut String) -> Result<bool, LlmError> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() {
        return Ok(false);
    }
    let part: OllamaResponse =
        serde_json::from_str(text).map_err(|e| LlmError::Parse(e.to_string()))?;
    let part = part.into_result(status)?;
    reply.push_str(&part.response);
    Ok(part.done)
}

#[async_trait]
impl LanguageModel for LlmClient {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str, options: &SamplingOptions) -> Result<String, LlmError> {
        self.call_ollama(prompt, options).await
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/api/tags", self.config.endpoint);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        #[derive(Deserialize)]
        struct TagsResponse {
            models: Vec<ModelInfo>,
        }

        #[derive(Deserialize)]
        struct ModelInfo {
            name: String,
        }

        let tags: TagsResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn is_available(&self) -> bool {
        if !self.config.enabled {
            return false;
        }
        let url = format!("{}/api/tags", self.config.endpoint);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Failed to connect to LLM service
    #[error("Connection error: {0}")]
    Connection(String),

    /// API returned a non-success status
    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),

    /// LLM is disabled
    #[error("LLM is disabled")]
    Disabled,
}

impl LlmError {
    /// Upstream HTTP status, when the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
