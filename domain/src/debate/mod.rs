//! Debate domain.
//!
//! - [`entities::Debate`]: the aggregate root
//! - [`ledger::MessageLedger`]: dedup-enforcing statement store
//! - [`cursor::TurnCursor`]: position over (round, participant) cells
//! - [`normalize::normalize_statement`]: end-of-stream cleanup

pub mod cell;
pub mod cursor;
pub mod entities;
pub mod ledger;
pub mod normalize;
pub mod statement;
pub mod summary;

pub use cell::CellKey;
pub use cursor::{Transition, TurnCursor};
pub use entities::{Debate, DebateId};
pub use ledger::{AppendOutcome, MessageLedger, OpenOutcome};
pub use normalize::normalize_statement;
pub use statement::{Statement, StatementStatus};
pub use summary::DebateSummary;
