//! Scheduling parameters for turn pacing and voting policy.
//!
//! [`SchedulingParams`] groups the static parameters that control the
//! scheduler loop in [`TurnScheduler`](crate::use_cases::run_debate::TurnScheduler).
//! Pacing delays are for readability only; no invariant depends on them.

use debate_domain::BallotPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scheduler loop control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingParams {
    /// Start the next cell automatically after one completes.
    pub auto_advance: bool,
    /// Pause between two experts in the same round.
    pub participant_delay: Duration,
    /// Pause before the first expert of a new round.
    pub round_delay: Duration,
    /// Pause between the last statement and the hand-off to voting.
    pub settle_delay: Duration,
    /// How many ballots a finished debate accepts.
    pub ballot_policy: BallotPolicy,
}

impl Default for SchedulingParams {
    fn default() -> Self {
        Self {
            auto_advance: true,
            participant_delay: Duration::from_millis(1000),
            round_delay: Duration::from_millis(1500),
            settle_delay: Duration::from_millis(1000),
            ballot_policy: BallotPolicy::Single,
        }
    }
}

impl SchedulingParams {
    // ==================== Builder Methods ====================

    pub fn with_auto_advance(mut self, enabled: bool) -> Self {
        self.auto_advance = enabled;
        self
    }

    pub fn with_participant_delay(mut self, delay: Duration) -> Self {
        self.participant_delay = delay;
        self
    }

    pub fn with_round_delay(mut self, delay: Duration) -> Self {
        self.round_delay = delay;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_ballot_policy(mut self, policy: BallotPolicy) -> Self {
        self.ballot_policy = policy;
        self
    }

    /// No pauses at all, for tests and non-interactive runs
    pub fn without_pacing(self) -> Self {
        self.with_participant_delay(Duration::ZERO)
            .with_round_delay(Duration::ZERO)
            .with_settle_delay(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pacing() {
        let params = SchedulingParams::default();
        assert!(params.auto_advance);
        assert_eq!(params.participant_delay, Duration::from_millis(1000));
        assert_eq!(params.round_delay, Duration::from_millis(1500));
        assert_eq!(params.settle_delay, Duration::from_millis(1000));
        assert_eq!(params.ballot_policy, BallotPolicy::Single);
    }

    #[test]
    fn test_without_pacing() {
        let params = SchedulingParams::default()
            .with_auto_advance(false)
            .without_pacing();
        assert!(!params.auto_advance);
        assert_eq!(params.round_delay, Duration::ZERO);
    }
}
