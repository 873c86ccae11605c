//! Configuration file loading for expert-debate
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `EXPERT_DEBATE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./debate.toml` or `./.debate.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/expert-debate/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, ConfigValidationError, FileConfig, FileGeneratorConfig, FileHistoryConfig,
    FileLogConfig, FileOutputConfig, FileSchedulerConfig, FileVotingConfig, Severity,
};
pub use loader::ConfigLoader;
