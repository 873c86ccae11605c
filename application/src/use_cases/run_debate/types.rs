//! Type definitions for the RunDebate use case.

use crate::ports::text_generator::GenerationError;
use crate::store::StoreError;
use debate_domain::{CellKey, Transition};
use thiserror::Error;

/// Errors that can occur while running a debate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunDebateError {
    #[error("No debate is in progress")]
    NoActiveDebate,

    #[error("Turn cursor points at participant {0}, outside the panel")]
    CursorOutOfRange(usize),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("State error: {0}")]
    Store(#[from] StoreError),
}

impl RunDebateError {
    /// A generation failure leaves the cell retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, RunDebateError::Generation(_))
    }
}

/// Result of one call to
/// [`TurnScheduler::generate_next_response`](super::TurnScheduler::generate_next_response)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// A statement was generated for `key`
    Spoken {
        key: CellKey,
        transition: Option<Transition>,
    },
    /// The cell already held a complete statement; the cursor moved on
    AlreadySpoken {
        key: CellKey,
        transition: Option<Transition>,
    },
    /// Another caller is generating this cell; nothing was done
    Duplicate(CellKey),
    /// Every cell is spoken
    Finished,
}

impl StepOutcome {
    pub fn transition(&self) -> Option<Transition> {
        match self {
            StepOutcome::Spoken { transition, .. }
            | StepOutcome::AlreadySpoken { transition, .. } => *transition,
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&CellKey> {
        match self {
            StepOutcome::Spoken { key, .. }
            | StepOutcome::AlreadySpoken { key, .. }
            | StepOutcome::Duplicate(key) => Some(key),
            StepOutcome::Finished => None,
        }
    }
}

/// How a call to [`TurnScheduler::run`](super::TurnScheduler::run) ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebateOutcome {
    /// All cells are spoken and the settle pause has elapsed
    Completed,
    /// Auto-advance is off; waiting for the next manual continue
    Paused,
    /// The cancellation token fired
    Cancelled,
}
