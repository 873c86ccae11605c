//! Cell key: the atomic unit of scheduled work

use crate::core::round::Round;
use crate::panel::value_objects::ExpertId;
use serde::{Deserialize, Serialize};

/// A (participant, round) pair (Value Object)
///
/// Each cell holds at most one statement for the lifetime of a debate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub expert_id: ExpertId,
    pub round: Round,
}

impl CellKey {
    pub fn new(expert_id: impl Into<ExpertId>, round: Round) -> Self {
        Self {
            expert_id: expert_id.into(),
            round,
        }
    }
}

impl std::fmt::Display for CellKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.expert_id, self.round)
    }
}
