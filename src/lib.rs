//! certylex - legal document review assistant.
//!
//! Sends Spanish legal documents to a local LLM, parses the structured reply,
//! annotates the document with suggestions, alerts and notes, and extracts
//! the parties' names and ID numbers.

pub mod config;
pub mod llm;
pub mod server;
pub mod services;
