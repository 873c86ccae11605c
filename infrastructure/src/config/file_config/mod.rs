//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod generator;
mod history;
mod log;
mod output;
mod scheduler;
mod voting;

pub use generator::FileGeneratorConfig;
pub use history::FileHistoryConfig;
pub use log::FileLogConfig;
pub use output::FileOutputConfig;
pub use scheduler::FileSchedulerConfig;
pub use voting::FileVotingConfig;

use debate_application::{PanelOptions, SchedulingParams};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("{field}: unknown value '{value}' (expected one of: {})", .valid_values.join(", "))]
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },

    #[error("{field} cannot be empty")]
    EmptyValue { field: String },

    #[error("{field} must be greater than 0")]
    ZeroValue { field: String },

    #[error("generator.temperature must be between 0.0 and 2.0 (got {0})")]
    TemperatureOutOfRange(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The value was replaced by a default
    Warning,
    /// The configuration cannot be used as is
    Error,
}

/// One problem found by [`FileConfig::validate`]
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigValidationError,
}

impl ConfigIssue {
    pub fn new(severity: Severity, code: ConfigValidationError) -> Self {
        Self { severity, code }
    }

    pub fn message(&self) -> String {
        self.code.to_string()
    }

    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Turn pacing
    pub scheduler: FileSchedulerConfig,
    /// Ballot policy
    pub voting: FileVotingConfig,
    /// Default panel options
    pub panel: PanelOptions,
    /// History archive persistence
    pub history: FileHistoryConfig,
    /// Text generation endpoint
    pub generator: FileGeneratorConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Structured transcript log
    pub log: FileLogConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.voting.parse_ballot_policy().1);

        if self.panel.count == 0 {
            issues.push(ConfigIssue::new(
                Severity::Error,
                ConfigValidationError::ZeroValue {
                    field: "panel.count".to_string(),
                },
            ));
        }

        for (field, value) in [
            ("generator.base_url", &self.generator.base_url),
            ("generator.model", &self.generator.model),
        ] {
            if value.trim().is_empty() {
                issues.push(ConfigIssue::new(
                    Severity::Error,
                    ConfigValidationError::EmptyValue {
                        field: field.to_string(),
                    },
                ));
            }
        }

        if !(0.0..=2.0).contains(&self.generator.temperature) {
            issues.push(ConfigIssue::new(
                Severity::Error,
                ConfigValidationError::TemperatureOutOfRange(self.generator.temperature),
            ));
        }

        if self.generator.max_tokens == 0 {
            issues.push(ConfigIssue::new(
                Severity::Error,
                ConfigValidationError::ZeroValue {
                    field: "generator.max_tokens".to_string(),
                },
            ));
        }

        // Zero pacing is legal but makes auto-advance unreadable
        if self.scheduler.auto_advance
            && self.scheduler.participant_delay_ms == 0
            && self.scheduler.round_delay_ms == 0
        {
            issues.push(ConfigIssue::new(
                Severity::Warning,
                ConfigValidationError::ZeroValue {
                    field: "scheduler.participant_delay_ms".to_string(),
                },
            ));
        }

        issues
    }

    /// Build the scheduler parameters from `[scheduler]` and `[voting]`
    pub fn scheduling_params(&self) -> SchedulingParams {
        let (policy, _) = self.voting.parse_ballot_policy();
        SchedulingParams::default()
            .with_auto_advance(self.scheduler.auto_advance)
            .with_participant_delay(Duration::from_millis(self.scheduler.participant_delay_ms))
            .with_round_delay(Duration::from_millis(self.scheduler.round_delay_ms))
            .with_settle_delay(Duration::from_millis(self.scheduler.settle_delay_ms))
            .with_ballot_policy(policy)
    }
}
