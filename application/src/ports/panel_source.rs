//! Panel source port
//!
//! Assembling a panel happens before a debate exists. A failure here is a
//! precondition failure: no debate is ever constructed without a panel.

use async_trait::async_trait;
use debate_domain::{Expert, Topic};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Panel source unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid panel: {0}")]
    Invalid(String),

    #[error("No experts left after applying panel options")]
    Empty,
}

/// Options for assembling a panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelOptions {
    /// Maximum number of experts
    pub count: usize,
    /// Free-form tone hint, e.g. "academic" or "heated"
    pub tone: String,
    /// Free-form diversity hint
    pub diversity: String,
    /// Whether fictional experts may sit on the panel
    pub allow_fictional: bool,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            count: 4,
            tone: "balanced".to_string(),
            diversity: "high".to_string(),
            allow_fictional: true,
        }
    }
}

/// Supplies the ordered list of experts for a topic
#[async_trait]
pub trait PanelSource: Send + Sync {
    async fn assemble(
        &self,
        topic: &Topic,
        options: &PanelOptions,
    ) -> Result<Vec<Expert>, PanelError>;
}
