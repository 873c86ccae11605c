//! Port for structured debate transcript logging.
//!
//! Defines the [`ConversationLogger`] trait for recording debate events
//! (statements, failures, votes, archive commits) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures the debate transcript
//! in a machine-readable format (JSONL).

use debate_domain::{CellKey, Debate, DebateId, ExpertId};
use serde_json::{Value, json};

/// A structured debate event for logging.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    /// Event type identifier (e.g., "statement_completed", "vote_cast").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn debate_started(debate: &Debate) -> Self {
        Self::new(
            "debate_started",
            json!({
                "debate_id": debate.id().as_str(),
                "topic": debate.topic().title,
                "panel": debate.panel().iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            }),
        )
    }

    pub fn statement_started(debate_id: &DebateId, key: &CellKey) -> Self {
        Self::new(
            "statement_started",
            json!({
                "debate_id": debate_id.as_str(),
                "expert": key.expert_id.as_str(),
                "round": key.round.as_str(),
            }),
        )
    }

    pub fn statement_completed(debate_id: &DebateId, key: &CellKey, content: &str) -> Self {
        Self::new(
            "statement_completed",
            json!({
                "debate_id": debate_id.as_str(),
                "expert": key.expert_id.as_str(),
                "round": key.round.as_str(),
                "bytes": content.len(),
                "text": content,
            }),
        )
    }

    pub fn generation_failed(
        debate_id: &DebateId,
        key: &CellKey,
        error: &str,
        partial: &str,
    ) -> Self {
        Self::new(
            "generation_failed",
            json!({
                "debate_id": debate_id.as_str(),
                "expert": key.expert_id.as_str(),
                "round": key.round.as_str(),
                "error": error,
                "partial_bytes": partial.len(),
            }),
        )
    }

    pub fn debate_completed(debate_id: &DebateId, statements: usize) -> Self {
        Self::new(
            "debate_completed",
            json!({ "debate_id": debate_id.as_str(), "statements": statements }),
        )
    }

    pub fn vote_cast(debate_id: &DebateId, expert_id: &ExpertId, count: u32) -> Self {
        Self::new(
            "vote_cast",
            json!({
                "debate_id": debate_id.as_str(),
                "expert": expert_id.as_str(),
                "count": count,
            }),
        )
    }

    pub fn debate_archived(debate_id: &DebateId, archive_len: usize, evicted: usize) -> Self {
        Self::new(
            "debate_archived",
            json!({
                "debate_id": debate_id.as_str(),
                "archive_len": archive_len,
                "evicted": evicted,
            }),
        )
    }

    pub fn summary_attached(debate_id: &DebateId, verdict: &str) -> Self {
        Self::new(
            "summary_attached",
            json!({ "debate_id": debate_id.as_str(), "verdict": verdict }),
        )
    }
}

/// Port for logging debate events to a structured log.
///
/// The `log` method is synchronous and non-fallible so that logging never
/// disrupts the scheduler; failures are ignored by implementations.
pub trait ConversationLogger: Send + Sync {
    /// Record a debate event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
