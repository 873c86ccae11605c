//! History store port
//!
//! Only the history archive survives a restart. The live debate is kept in
//! memory and may be lost on a crash.

use debate_domain::HistoryEntry;
use thiserror::Error;

/// Errors from the persistent history store
#[derive(Error, Debug)]
pub enum HistoryStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt history file: {0}")]
    Corrupt(String),
}

/// Persistent storage for the history archive
pub trait HistoryStore: Send + Sync {
    /// Load archived entries, newest first. A missing store is empty.
    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryStoreError>;

    /// Replace the stored archive with `entries`.
    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryStoreError>;
}

/// Store that keeps nothing, for tests and `--no-history` runs
pub struct NoHistoryStore;

impl HistoryStore for NoHistoryStore {
    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryStoreError> {
        Ok(Vec::new())
    }

    fn save(&self, _entries: &[HistoryEntry]) -> Result<(), HistoryStoreError> {
        Ok(())
    }
}
