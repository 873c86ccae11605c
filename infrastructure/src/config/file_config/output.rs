//! `[output]` section

use debate_domain::OutputFormat;
use serde::{Deserialize, Serialize};

/// How finished debates are printed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Default format when `-o` is not given
    pub format: Option<OutputFormat>,
    /// Set to false to print plain text even on a terminal
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}
