//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod conversation_logger;
pub mod history_store;
pub mod panel_source;
pub mod progress;
pub mod summarizer;
pub mod text_generator;
