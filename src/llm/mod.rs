//! LLM integration for legal document review.
//!
//! Uses a local LLM (via Ollama) to analyse documents and suggest improvements.

mod client;

pub use client::prompts;
pub use client::{LanguageModel, LlmClient, LlmConfig, LlmError, SamplingOptions};
