//! HTTP API for document review.
//!
//! Exposes the analysis pipeline, entity extraction, the sample document and
//! backend status as JSON endpoints.

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Config;
use crate::llm::LlmClient;
use crate::services::AnalysisService;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AnalysisService>,
    /// LLM endpoint reported by `/api/status`.
    pub llm_endpoint: String,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let model = Arc::new(LlmClient::new(config.llm.clone()));
        let service = AnalysisService::new(
            model,
            config.entities.build(),
            config.llm.sampling(),
            config.llm.summary_max_tokens,
        );

        Self {
            service: Arc::new(service),
            llm_endpoint: config.llm.endpoint.clone(),
        }
    }
}

/// Parse a bind address that can be:
/// - Just a port: "3030" -> 127.0.0.1:3030
/// - Just a host: "0.0.0.0" -> 0.0.0.0:3030
/// - Host and port: "0.0.0.0:3030" -> 0.0.0.0:3030
pub fn parse_bind_address(bind: &str) -> anyhow::Result<SocketAddr> {
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(SocketAddr::from(([127, 0, 0, 1], port)));
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok(format!("{}:{}", host, port).parse()?);
        }
    }

    Ok(format!("{}:3030", bind).parse()?)
}

/// Start the web server.
pub async fn serve(config: &Config, addr: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::new(config);
    let app = create_router(state);

    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
