//! Domain layer for expert-debate
//!
//! This crate contains the core debate entities, value objects and pure state
//! machines. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Cells
//!
//! A debate is a grid of cells, one per (expert, round) pair. Every cell holds
//! at most one [`Statement`], stored in the [`MessageLedger`].
//!
//! ```text
//!              opening   arguments   rebuttals   closing
//!   expert 0     ■           ■           □          □
//!   expert 1     ■           ◧           □          □
//!   expert 2     ■           □           □          □
//!
//!   ■ complete   ◧ streaming   □ empty
//! ```
//!
//! ## Turn order
//!
//! The [`TurnCursor`] walks the grid column by column, in panel order, and
//! ends in a terminal "done" state after the last closing statement.
//!
//! ## After the debate
//!
//! A finished debate is voted on ([`VoteTally`]) and archived
//! ([`HistoryArchive`], capped at [`HISTORY_CAPACITY`] entries).

pub mod core;
pub mod debate;
pub mod history;
pub mod panel;
pub mod prompt;
pub mod session;
pub mod vote;

// Re-export commonly used types
pub use self::core::{
    error::DomainError, output_format::OutputFormat, round::Round, topic::Topic,
};
pub use debate::{
    AppendOutcome, CellKey, Debate, DebateId, DebateSummary, MessageLedger, OpenOutcome,
    Statement, StatementStatus, Transition, TurnCursor, normalize_statement,
};
pub use history::{CommitOutcome, HISTORY_CAPACITY, HistoryArchive, HistoryEntry};
pub use panel::{Expert, ExpertId, Panel, Stance};
pub use prompt::DebatePromptTemplate;
pub use session::stream::StreamEvent;
pub use vote::{BallotPolicy, Standing, VoteTally};
