//! Debate aggregate root

use super::cell::CellKey;
use super::ledger::{MessageLedger, OpenOutcome};
use super::statement::Statement;
use super::summary::DebateSummary;
use crate::core::error::DomainError;
use crate::core::round::Round;
use crate::core::topic::Topic;
use crate::panel::entities::{Expert, Panel};
use crate::panel::value_objects::ExpertId;
use crate::vote::tally::{BallotPolicy, Standing, VoteTally};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier of a debate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DebateId(String);

impl DebateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DebateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A debate (Aggregate Root)
///
/// Owns its statements, tally and summary. Once `is_complete` is set it is
/// never unset, and it is only set when every panel member has a complete
/// statement in every round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debate {
    id: DebateId,
    topic: Topic,
    panel: Panel,
    #[serde(rename = "messages")]
    ledger: MessageLedger,
    current_round: Round,
    is_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    votes: Option<VoteTally>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    summary: Option<DebateSummary>,
    created_at: DateTime<Utc>,
}

impl Debate {
    pub fn new(topic: Topic, panel: Panel) -> Self {
        Self {
            id: DebateId::generate(),
            topic,
            panel,
            ledger: MessageLedger::new(),
            current_round: Round::Opening,
            is_complete: false,
            votes: None,
            summary: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: DebateId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> &DebateId {
        &self.id
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn ledger(&self) -> &MessageLedger {
        &self.ledger
    }

    pub fn current_round(&self) -> Round {
        self.current_round
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn votes(&self) -> Option<&VoteTally> {
        self.votes.as_ref()
    }

    pub fn summary(&self) -> Option<&DebateSummary> {
        self.summary.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Cell key for the expert at `index` in the given round
    pub fn cell_at(&self, index: usize, round: Round) -> Option<CellKey> {
        self.panel
            .get(index)
            .map(|expert| CellKey::new(expert.id.clone(), round))
    }

    pub fn statement(&self, key: &CellKey) -> Option<&Statement> {
        self.ledger.get(key)
    }

    /// Statements already made in `round`, as (expert, content) pairs
    pub fn round_transcript(&self, round: Round) -> Vec<(&Expert, &str)> {
        self.ledger
            .in_round(round)
            .filter(|s| s.is_complete())
            .filter_map(|s| self.panel.find(s.expert_id()).map(|e| (e, s.content())))
            .collect()
    }

    /// `true` once every cell holds a complete statement
    pub fn is_fully_spoken(&self) -> bool {
        Round::ALL.iter().all(|round| {
            self.panel
                .iter()
                .all(|e| self.ledger.is_filled(&CellKey::new(e.id.clone(), *round)))
        })
    }

    /// Open a cell for streaming (see [`MessageLedger::open`])
    pub fn open_statement(
        &mut self,
        key: &CellKey,
        now: DateTime<Utc>,
    ) -> Result<OpenOutcome, DomainError> {
        self.ensure_member(&key.expert_id)?;
        Ok(self.ledger.open(key, now))
    }

    pub fn update_statement(
        &mut self,
        key: &CellKey,
        content: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.ledger.update_content(key, content)
    }

    pub fn complete_statement(
        &mut self,
        key: &CellKey,
        final_text: Option<String>,
    ) -> Result<bool, DomainError> {
        self.ledger.complete(key, final_text)
    }

    pub fn fail_statement(&mut self, key: &CellKey) -> Result<(), DomainError> {
        self.ledger.mark_failed(key)
    }

    pub fn set_current_round(&mut self, round: Round) {
        self.current_round = round;
    }

    /// Set the completion flag. Fails unless every cell is spoken.
    pub fn mark_complete(&mut self) -> Result<(), DomainError> {
        if self.is_complete {
            return Ok(());
        }
        if !self.is_fully_spoken() {
            return Err(DomainError::DebateIncomplete);
        }
        self.is_complete = true;
        Ok(())
    }

    /// Cast a ballot; the tally is created on the first vote
    pub fn cast_vote(
        &mut self,
        expert_id: &ExpertId,
        policy: BallotPolicy,
    ) -> Result<u32, DomainError> {
        if !self.is_complete {
            return Err(DomainError::DebateIncomplete);
        }
        let tally = self.votes.get_or_insert_with(|| VoteTally::new(policy));
        tally.cast(&self.panel, expert_id)
    }

    pub fn has_votes(&self) -> bool {
        self.votes.as_ref().is_some_and(VoteTally::has_votes)
    }

    /// Ranked standings; all zero before any vote
    pub fn standings(&self) -> Vec<Standing> {
        match &self.votes {
            Some(tally) => tally.standings(&self.panel),
            None => VoteTally::default().standings(&self.panel),
        }
    }

    /// Winner, if at least one vote was cast
    pub fn winner(&self) -> Option<&Expert> {
        self.votes.as_ref().and_then(|t| t.winner(&self.panel))
    }

    /// Attach the summary; a debate is summarized at most once
    pub fn attach_summary(&mut self, summary: DebateSummary) -> Result<(), DomainError> {
        if !self.is_complete {
            return Err(DomainError::DebateIncomplete);
        }
        if self.summary.is_some() {
            return Err(DomainError::AlreadySummarized);
        }
        self.summary = Some(summary);
        Ok(())
    }

    fn ensure_member(&self, id: &ExpertId) -> Result<(), DomainError> {
        if self.panel.contains(id) {
            Ok(())
        } else {
            Err(DomainError::UnknownExpert(id.clone()))
        }
    }
}
