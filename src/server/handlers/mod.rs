//! HTTP request handlers for the API server.

mod analysis_api;
mod entities_api;
mod helpers;
mod models_api;

// Re-export handlers for use by the router
pub use analysis_api::{analyze_document, sample_document};
pub use entities_api::extract_entities;
pub use models_api::{api_status, list_models};
