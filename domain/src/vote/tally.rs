//! Vote tally for a finished debate
//!
//! Ranking is descending by votes with ties broken by panel order, so the
//! result is deterministic even before any ballot is cast.

use crate::core::error::DomainError;
use crate::panel::entities::{Expert, Panel};
use crate::panel::value_objects::ExpertId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How many ballots a debate accepts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallotPolicy {
    /// One ballot per debate (the local user votes once)
    #[default]
    Single,
    /// Any number of ballots
    Unlimited,
}

impl BallotPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BallotPolicy::Single => "single",
            BallotPolicy::Unlimited => "unlimited",
        }
    }
}

impl std::str::FromStr for BallotPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "once" => Ok(BallotPolicy::Single),
            "unlimited" | "multiple" => Ok(BallotPolicy::Unlimited),
            other => Err(format!("unknown ballot policy '{}'", other)),
        }
    }
}

/// Vote counts per expert
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    counts: BTreeMap<ExpertId, u32>,
    #[serde(default)]
    policy: BallotPolicy,
    #[serde(default)]
    ballots_cast: u32,
}

/// One row of the ranked results
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub expert_id: ExpertId,
    pub votes: u32,
    /// Fraction of all votes, `0.0..=1.0`
    pub share: f64,
}

impl Standing {
    pub fn percentage(&self) -> f64 {
        self.share * 100.0
    }
}

impl VoteTally {
    pub fn new(policy: BallotPolicy) -> Self {
        Self {
            counts: BTreeMap::new(),
            policy,
            ballots_cast: 0,
        }
    }

    pub fn policy(&self) -> BallotPolicy {
        self.policy
    }

    /// Record one ballot for `expert_id`, returning its new count
    pub fn cast(&mut self, panel: &Panel, expert_id: &ExpertId) -> Result<u32, DomainError> {
        if !panel.contains(expert_id) {
            return Err(DomainError::UnknownExpert(expert_id.clone()));
        }
        if self.policy == BallotPolicy::Single && self.ballots_cast > 0 {
            return Err(DomainError::AlreadyVoted);
        }

        let count = self.counts.entry(expert_id.clone()).or_insert(0);
        *count += 1;
        self.ballots_cast += 1;
        Ok(*count)
    }

    pub fn count(&self, expert_id: &ExpertId) -> u32 {
        self.counts.get(expert_id).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn has_votes(&self) -> bool {
        self.ballots_cast > 0
    }

    /// Ranked standings for every panel member
    pub fn standings(&self, panel: &Panel) -> Vec<Standing> {
        let denominator = f64::from(self.total().max(1));
        let mut standings: Vec<Standing> = panel
            .iter()
            .map(|expert| {
                let votes = self.count(&expert.id);
                Standing {
                    expert_id: expert.id.clone(),
                    votes,
                    share: f64::from(votes) / denominator,
                }
            })
            .collect();
        // sort_by is stable: equal counts keep panel order
        standings.sort_by(|a, b| b.votes.cmp(&a.votes));
        standings
    }

    /// First in the ranking. With no votes this is only the nominal leader.
    pub fn leader<'a>(&self, panel: &'a Panel) -> Option<&'a Expert> {
        self.standings(panel)
            .first()
            .and_then(|s| panel.find(&s.expert_id))
    }

    /// Leader, but only once at least one vote exists
    pub fn winner<'a>(&self, panel: &'a Panel) -> Option<&'a Expert> {
        if self.total() == 0 {
            return None;
        }
        self.leader(panel)
    }
}
