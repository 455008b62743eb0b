//! Service layer for certylex business logic.
//!
//! This module contains domain logic separated from UI concerns.
//! Services can be used by CLI, web server, or other interfaces.

pub mod analysis;
pub mod annotation;
pub mod document;
pub mod entities;
pub mod ner;

pub use analysis::{AnalysisError, AnalysisOutcome, AnalysisService};
pub use document::{DocumentSource, SAMPLE_CONTRACT};
pub use entities::{correlate, EntityTable};
pub use ner::{EntityConfig, EntityExtractor};
