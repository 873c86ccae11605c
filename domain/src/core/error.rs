//! Domain error types

use crate::debate::cell::CellKey;
use crate::panel::value_objects::ExpertId;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("A debate panel needs at least one expert")]
    EmptyPanel,

    #[error("Expert {0} appears more than once in the panel")]
    DuplicateExpert(ExpertId),

    #[error("Expert {0} is not on this panel")]
    UnknownExpert(ExpertId),

    #[error("No statement recorded for {0}")]
    StatementNotFound(CellKey),

    #[error("Statement for {0} is already complete")]
    StatementSealed(CellKey),

    #[error("Debate is not complete yet")]
    DebateIncomplete,

    #[error("A ballot has already been cast for this debate")]
    AlreadyVoted,

    #[error("Debate already has a summary")]
    AlreadySummarized,

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),
}

impl DomainError {
    /// Check if this error comes from a ballot policy rather than bad input
    pub fn is_policy_violation(&self) -> bool {
        matches!(self, DomainError::AlreadyVoted | DomainError::AlreadySummarized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::round::Round;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::EmptyPanel.to_string(),
            "A debate panel needs at least one expert"
        );
        let key = CellKey::new(ExpertId::new("b"), Round::Arguments);
        assert_eq!(
            DomainError::StatementNotFound(key).to_string(),
            "No statement recorded for b/arguments"
        );
    }

    #[test]
    fn test_is_policy_violation() {
        assert!(DomainError::AlreadyVoted.is_policy_violation());
        assert!(DomainError::AlreadySummarized.is_policy_violation());
        assert!(!DomainError::EmptyPanel.is_policy_violation());
        assert!(!DomainError::DebateIncomplete.is_policy_violation());
    }
}
