//! Summary collaborator port

use async_trait::async_trait;
use debate_domain::{Debate, DebateSummary};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    #[error("Summary request failed: {0}")]
    RequestFailed(String),

    #[error("Unparsable summary: {0}")]
    InvalidOutput(String),
}

/// Produces the closing summary of a finished debate
#[async_trait]
pub trait DebateSummarizer: Send + Sync {
    async fn summarize(&self, debate: &Debate) -> Result<DebateSummary, SummaryError>;
}
