//! Statement entity

use super::cell::CellKey;
use crate::core::round::Round;
use crate::panel::value_objects::ExpertId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a statement's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementStatus {
    /// Fragments are still arriving
    Streaming,
    /// The stream finished and content is final
    Complete,
    /// The stream broke off; content holds whatever arrived
    Failed,
}

/// One expert's statement in one round (Entity)
///
/// Content is only mutated through [`MessageLedger`](super::ledger::MessageLedger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    expert_id: ExpertId,
    round: Round,
    content: String,
    status: StatementStatus,
    created_at: DateTime<Utc>,
}

impl Statement {
    /// A fresh, empty statement that is about to receive fragments
    pub fn streaming(key: CellKey, created_at: DateTime<Utc>) -> Self {
        Self {
            expert_id: key.expert_id,
            round: key.round,
            content: String::new(),
            status: StatementStatus::Streaming,
            created_at,
        }
    }

    /// A finished statement, e.g. restored from an archived debate
    pub fn complete(key: CellKey, content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            expert_id: key.expert_id,
            round: key.round,
            content: content.into(),
            status: StatementStatus::Complete,
            created_at,
        }
    }

    pub fn key(&self) -> CellKey {
        CellKey::new(self.expert_id.clone(), self.round)
    }

    pub fn expert_id(&self) -> &ExpertId {
        &self.expert_id
    }

    pub fn round(&self) -> Round {
        self.round
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn status(&self) -> StatementStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_complete(&self) -> bool {
        self.status == StatementStatus::Complete
    }

    pub fn is_streaming(&self) -> bool {
        self.status == StatementStatus::Streaming
    }

    pub fn is_failed(&self) -> bool {
        self.status == StatementStatus::Failed
    }

    pub(crate) fn matches(&self, key: &CellKey) -> bool {
        self.expert_id == key.expert_id && self.round == key.round
    }

    pub(crate) fn set_content(&mut self, content: String) {
        self.content = content;
    }

    pub(crate) fn set_status(&mut self, status: StatementStatus) {
        self.status = status;
    }
}
