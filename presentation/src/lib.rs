//! Presentation layer for expert-debate
//!
//! This crate contains the CLI definition, output formatters,
//! progress reporters and the manual-mode prompt.

pub mod cli;
pub mod interactive;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use interactive::{ContinueDecision, prompt_vote, wait_for_continue};
pub use output::{console::ConsoleFormatter, disable_color};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
