//! Archive of finished debates.

pub mod archive;

pub use archive::{CommitOutcome, HISTORY_CAPACITY, HistoryArchive, HistoryEntry};
