//! Voting configuration from TOML (`[voting]` section)

use super::{ConfigIssue, ConfigValidationError, Severity};
use debate_domain::BallotPolicy;
use serde::{Deserialize, Serialize};

/// Raw voting configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVotingConfig {
    /// "single" (one ballot per debate) or "unlimited"
    pub ballot_policy: String,
}

impl Default for FileVotingConfig {
    fn default() -> Self {
        Self {
            ballot_policy: BallotPolicy::Single.as_str().to_string(),
        }
    }
}

impl FileVotingConfig {
    /// Parse the ballot policy, falling back to `single` on unknown values
    pub fn parse_ballot_policy(&self) -> (BallotPolicy, Vec<ConfigIssue>) {
        match self.ballot_policy.parse::<BallotPolicy>() {
            Ok(policy) => (policy, Vec::new()),
            Err(_) => (
                BallotPolicy::default(),
                vec![ConfigIssue::new(
                    Severity::Warning,
                    ConfigValidationError::InvalidEnumValue {
                        field: "voting.ballot_policy".to_string(),
                        value: self.ballot_policy.clone(),
                        valid_values: vec!["single".to_string(), "unlimited".to_string()],
                    },
                )],
            ),
        }
    }
}
