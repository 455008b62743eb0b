//! LLM client configuration.

use serde::{Deserialize, Serialize};

use super::SamplingOptions;

/// Configuration for the Ollama completion client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Whether LLM analysis is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Ollama API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model used for both the analysis and the summary prompt
    #[serde(default = "default_model")]
    pub model: String,
    /// Temperature for the analysis prompt (the summary prompt adds a small boost)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Nucleus sampling cutoff
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    /// Maximum tokens in the analysis response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Maximum tokens in the summary response
    #[serde(default = "default_summary_max_tokens")]
    pub summary_max_tokens: u32,
    /// Consume the reply as an NDJSON token stream instead of a single body
    #[serde(default)]
    pub stream: bool,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_temperature() -> f32 {
    0.5
}

fn default_top_p() -> f32 {
    0.9
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_summary_max_tokens() -> u32 {
    1024
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl LlmConfig {
    /// Base default without env overrides.
    pub fn base_default() -> Self {
        Self {
            enabled: default_enabled(),
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            summary_max_tokens: default_summary_max_tokens(),
            stream: false,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `LLM_ENABLED`: "true" or "false"
    /// - `LLM_ENDPOINT` (or `OLLAMA_HOST`): Ollama endpoint
    /// - `LLM_MODEL`: Model name
    /// - `LLM_TEMPERATURE`: Generation temperature
    /// - `LLM_TOP_P`: Nucleus sampling cutoff
    /// - `LLM_MAX_TOKENS`: Maximum tokens in the analysis response
    /// - `LLM_SUMMARY_MAX_TOKENS`: Maximum tokens in the summary response
    /// - `LLM_STREAM`: "true" to read replies as a token stream
    ///
    /// `LLM_ENDPOINT` wins over `OLLAMA_HOST` when both are set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = lookup("LLM_ENABLED") {
            self.enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }
        if let Some(val) = lookup("LLM_ENDPOINT").or_else(|| lookup("OLLAMA_HOST")) {
            self.endpoint = val.trim_end_matches('/').to_string();
        }
        if let Some(val) = lookup("LLM_MODEL") {
            self.model = val;
        }
        if let Some(val) = lookup("LLM_TEMPERATURE") {
            if let Ok(t) = val.parse() {
                self.temperature = t;
            }
        }
        if let Some(val) = lookup("LLM_TOP_P") {
            if let Ok(p) = val.parse() {
                self.top_p = p;
            }
        }
        if let Some(val) = lookup("LLM_MAX_TOKENS") {
            if let Ok(n) = val.parse() {
                self.max_tokens = n;
            }
        }
        if let Some(val) = lookup("LLM_SUMMARY_MAX_TOKENS") {
            if let Ok(n) = val.parse() {
                self.summary_max_tokens = n;
            }
        }
        if let Some(val) = lookup("LLM_STREAM") {
            self.stream = val.eq_ignore_ascii_case("true") || val == "1";
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Sampling options for the analysis prompt.
    pub fn sampling(&self) -> SamplingOptions {
        SamplingOptions {
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
        }
    }

    /// Hint shown when the service is unreachable.
    pub fn availability_hint(&self) -> String {
        if !self.enabled {
            return "LLM analysis is disabled (set llm.enabled = true)".to_string();
        }
        format!(
            "Ollama not reachable at {}. Make sure it is running: ollama serve && ollama pull {}",
            self.endpoint, self.model
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_default_matches_deployment() {
        let config = LlmConfig::base_default();
        assert!(config.enabled);
        assert_eq!(config.endpoint, "http://localhost:11434");
        assert_eq!(config.model, "llama3.2:3b");
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.summary_max_tokens, 1024);
        assert!(!config.stream);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: LlmConfig = serde_json::from_str(r#"{"model": "mistral:7b"}"#).unwrap();
        assert_eq!(config.model, "mistral:7b");
        assert_eq!(config.endpoint, "http://localhost:11434");
        assert!((config.top_p - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn with_endpoint_trims_trailing_slash() {
        let config = LlmConfig::base_default().with_endpoint("http://ollama:11434/");
        assert_eq!(config.endpoint, "http://ollama:11434");
    }

    #[test]
    fn ollama_host_override_trims_trailing_slash() {
        let config = LlmConfig::base_default().with_overrides(|key| match key {
            "OLLAMA_HOST" => Some("http://gpu-box:11434/".to_string()),
            "LLM_STREAM" => Some("1".to_string()),
            _ => None,
        });
        assert_eq!(config.endpoint, "http://gpu-box:11434");
        assert!(config.stream);
    }

    #[test]
    fn llm_endpoint_wins_over_ollama_host() {
        let config = LlmConfig::base_default().with_overrides(|key| match key {
            "LLM_ENDPOINT" => Some("http://primary:11434//".to_string()),
            "OLLAMA_HOST" => Some("http://fallback:11434".to_string()),
            "LLM_TEMPERATURE" => Some("not a number".to_string()),
            _ => None,
        });
        assert_eq!(config.endpoint, "http://primary:11434");
        assert!((config.temperature - LlmConfig::base_default().temperature).abs() < f32::EPSILON);
    }

    #[test]
    fn with_model_replaces_model_only() {
        let config = LlmConfig::base_default().with_model("mistral:7b");
        assert_eq!(config.model, "mistral:7b");
        assert_eq!(config.endpoint, "http://localhost:11434");
    }

    #[test]
    fn sampling_uses_configured_values() {
        let mut config = LlmConfig::base_default();
        config.temperature = 0.2;
        config.max_tokens = 512;
        let sampling = config.sampling();
        assert!((sampling.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(sampling.max_tokens, 512);
    }
}
