//! Infrastructure layer for expert-debate
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod generator;
pub mod history;
pub mod logging;
pub mod panel;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, ConfigValidationError, FileConfig, FileGeneratorConfig,
    FileHistoryConfig, FileLogConfig, FileOutputConfig, FileSchedulerConfig, FileVotingConfig,
    Severity,
};
pub use generator::OpenAiTextGenerator;
pub use history::JsonHistoryStore;
pub use logging::JsonlConversationLogger;
pub use panel::{PanelFile, TomlPanelSource};
