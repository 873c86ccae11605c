//! History archive: bounded, newest-first collection of finished debates.

use crate::debate::entities::{Debate, DebateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of archived debates
pub const HISTORY_CAPACITY: usize = 10;

/// Frozen snapshot of a debate
///
/// Holds its own copy of the debate; later changes to the live debate do not
/// reach an archived entry. There is no mutable access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    debate: Debate,
    archived_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn snapshot(debate: &Debate, archived_at: DateTime<Utc>) -> Self {
        Self {
            debate: debate.clone(),
            archived_at,
        }
    }

    pub fn debate(&self) -> &Debate {
        &self.debate
    }

    pub fn id(&self) -> &DebateId {
        self.debate.id()
    }

    pub fn archived_at(&self) -> DateTime<Utc> {
        self.archived_at
    }
}

/// What a commit did to the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOutcome {
    /// An older snapshot of the same debate was replaced
    pub replaced: bool,
    /// Entries dropped off the end
    pub evicted: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryArchive {
    entries: Vec<HistoryEntry>,
}

impl Default for HistoryArchive {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryArchive {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuild from persisted entries (assumed newest-first)
    pub fn from_entries(mut entries: Vec<HistoryEntry>) -> Self {
        entries.truncate(HISTORY_CAPACITY);
        Self { entries }
    }

    /// Prepend a snapshot of `debate` and cap the archive.
    ///
    /// Re-committing a debate that is already archived replaces its entry and
    /// moves it to the front.
    pub fn commit(&mut self, debate: &Debate, now: DateTime<Utc>) -> CommitOutcome {
        let before = self.entries.len();
        self.entries.retain(|e| e.id() != debate.id());
        let replaced = self.entries.len() < before;

        self.entries.insert(0, HistoryEntry::snapshot(debate, now));

        let evicted = self.entries.len().saturating_sub(HISTORY_CAPACITY);
        self.entries.truncate(HISTORY_CAPACITY);

        CommitOutcome { replaced, evicted }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &DebateId) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
