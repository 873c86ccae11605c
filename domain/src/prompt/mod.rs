//! Prompt templates for statement and summary generation.

pub mod template;

pub use template::DebatePromptTemplate;
