//! Inline annotation of legal documents.
//!
//! The annotator inserts delimited blocks into a copy of the document at
//! section boundaries; the alert extractor reads them back for display.

mod alerts;
mod annotator;
mod sections;
pub mod types;

pub use alerts::{extract_alerts, Alert, Severity};
pub use annotator::{annotate, Document};
pub use sections::{SectionMarker, SECTION_MARKERS};
pub use types::{AnnotatedDocument, AnnotationBlock, AnnotationKind};
