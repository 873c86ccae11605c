//! Scheduler pacing from TOML (`[scheduler]` section)

use serde::{Deserialize, Serialize};

/// Raw scheduler configuration from TOML
///
/// # Example
///
/// ```toml
/// [scheduler]
/// auto_advance = true
/// participant_delay_ms = 1000   # between two experts in a round
/// round_delay_ms = 1500         # before the first expert of a new round
/// settle_delay_ms = 1000        # before voting opens
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSchedulerConfig {
    pub auto_advance: bool,
    pub participant_delay_ms: u64,
    pub round_delay_ms: u64,
    pub settle_delay_ms: u64,
}

impl Default for FileSchedulerConfig {
    fn default() -> Self {
        Self {
            auto_advance: true,
            participant_delay_ms: 1000,
            round_delay_ms: 1500,
            settle_delay_ms: 1000,
        }
    }
}
