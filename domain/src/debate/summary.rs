//! Debate summary value object

use serde::{Deserialize, Serialize};

/// Closing summary of a finished debate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateSummary {
    pub summary: String,
    pub verdict: String,
    #[serde(default, alias = "keyTakeaways")]
    pub key_takeaways: Vec<String>,
}

impl DebateSummary {
    pub fn new(summary: impl Into<String>, verdict: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            verdict: verdict.into(),
            key_takeaways: Vec::new(),
        }
    }

    pub fn with_takeaways(mut self, takeaways: Vec<String>) -> Self {
        self.key_takeaways = takeaways;
        self
    }
}
