//! Configuration management for certylex using the prefer crate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::llm::LlmConfig;
use crate::services::ner::EntityConfig;

/// Default address for the HTTP API.
pub const DEFAULT_BIND: &str = "127.0.0.1:3030";

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind, `host:port` or a bare port.
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        let bind = std::env::var("CERTYLEX_BIND")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(default_bind);
        Self { bind }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Model backend.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Entity extraction backend.
    #[serde(default)]
    pub entities: EntityConfig,
    /// HTTP API.
    #[serde(default)]
    pub server: ServerConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers certylex config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("certylex").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => match Self::load_from_path(path).await {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!("{}; using defaults", e);
                        Self::default()
                    }
                },
                None => Self::default(),
            },
            // No config file found, use defaults with env overrides
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Format is chosen by extension: TOML, YAML, otherwise JSON.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e))?,
            _ => serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e))?,
        };

        config.source_path = Some(path.to_path_buf());
        config.llm.endpoint = config.llm.endpoint.trim_end_matches('/').to_string();
        config.entities.endpoint = config.entities.endpoint.trim_end_matches('/').to_string();
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ner::EntityBackend;
    use std::io::Write;

    fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn loads_toml() {
        let file = write_config(
            ".toml",
            r#"
[llm]
model = "mistral:7b"
endpoint = "http://gpu-box:11434/"
stream = true

[entities]
backend = "regex"

[server]
bind = "0.0.0.0:8080"
"#,
        );

        let config = Config::load_from_path(file.path()).await.unwrap();
        assert_eq!(config.llm.model, "mistral:7b");
        assert_eq!(config.llm.endpoint, "http://gpu-box:11434");
        assert!(config.llm.stream);
        assert_eq!(config.llm.max_tokens, 2048);
        assert_eq!(config.entities.backend, EntityBackend::Regex);
        assert_eq!(config.entities.endpoint, "http://localhost:5328");
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.source_path.as_deref(), Some(file.path()));
    }

    #[tokio::test]
    async fn loads_yaml() {
        let file = write_config(".yaml", "llm:\n  temperature: 0.3\n  top_p: 0.8\n");
        let config = Config::load_from_path(file.path()).await.unwrap();
        assert!((config.llm.temperature - 0.3).abs() < f32::EPSILON);
        assert!((config.llm.top_p - 0.8).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn loads_json_by_default() {
        let file = write_config(
            ".json",
            r#"{"entities": {"endpoint": "http://nlp:5328"}}"#,
        );
        let config = Config::load_from_path(file.path()).await.unwrap();
        assert_eq!(config.entities.endpoint, "http://nlp:5328");
        assert_eq!(config.entities.backend, EntityBackend::Remote);
    }

    #[tokio::test]
    async fn reports_parse_errors() {
        let file = write_config(".toml", "[llm\nmodel = ");
        let err = Config::load_from_path(file.path()).await.unwrap_err();
        assert!(err.contains("TOML"));
    }

    #[tokio::test]
    async fn reports_missing_file() {
        let err = Config::load_from_path(Path::new("/nonexistent/certylex.toml"))
            .await
            .unwrap_err();
        assert!(err.starts_with("Failed to read config file"));
    }
}
