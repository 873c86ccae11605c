//! Explicit state container shared by the scheduler, guard, accumulator and
//! finalization use cases.
//!
//! Every write to the live debate goes through one of the methods here. The
//! lock is held only for the duration of a single call and never across an
//! `.await`.

use chrono::Utc;
use debate_domain::{
    BallotPolicy, CellKey, CommitOutcome, Debate, DebateId, DebateSummary, DomainError,
    HistoryArchive, HistoryEntry, OpenOutcome, Round, Statement, StatementStatus,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("No debate is in progress")]
    NoActiveDebate,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Everything the store holds
#[derive(Debug, Default)]
pub struct DebateState {
    pub current: Option<Debate>,
    pub history: HistoryArchive,
    /// Last failure shown to the user, cleared when a new debate starts
    pub last_error: Option<String>,
    /// Debate whose summary request is in flight
    pub summary_pending: Option<DebateId>,
}

/// Cloneable handle to the shared debate state
#[derive(Debug, Clone, Default)]
pub struct DebateStore {
    inner: Arc<Mutex<DebateState>>,
}

impl DebateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with a previously persisted archive
    pub fn with_history(history: HistoryArchive) -> Self {
        Self {
            inner: Arc::new(Mutex::new(DebateState {
                history,
                ..DebateState::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DebateState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_debate_mut<R>(
        &self,
        f: impl FnOnce(&mut Debate) -> Result<R, DomainError>,
    ) -> Result<R, StoreError> {
        let mut state = self.lock();
        let debate = state.current.as_mut().ok_or(StoreError::NoActiveDebate)?;
        Ok(f(debate)?)
    }

    // ==================== Live debate ====================

    pub fn set_current(&self, debate: Debate) {
        let mut state = self.lock();
        state.current = Some(debate);
        state.last_error = None;
        state.summary_pending = None;
    }

    pub fn clear_current(&self) {
        let mut state = self.lock();
        state.current = None;
        state.last_error = None;
        state.summary_pending = None;
    }

    pub fn has_current(&self) -> bool {
        self.lock().current.is_some()
    }

    /// Read the live debate without cloning it
    pub fn with_debate<R>(&self, f: impl FnOnce(&Debate) -> R) -> Result<R, StoreError> {
        let state = self.lock();
        let debate = state.current.as_ref().ok_or(StoreError::NoActiveDebate)?;
        Ok(f(debate))
    }

    pub fn current_snapshot(&self) -> Option<Debate> {
        self.lock().current.clone()
    }

    pub fn current_id(&self) -> Option<DebateId> {
        self.lock().current.as_ref().map(|d| d.id().clone())
    }

    pub fn statement(&self, key: &CellKey) -> Option<Statement> {
        self.lock()
            .current
            .as_ref()
            .and_then(|d| d.statement(key).cloned())
    }

    pub fn statement_status(&self, key: &CellKey) -> Option<StatementStatus> {
        self.lock()
            .current
            .as_ref()
            .and_then(|d| d.statement(key).map(Statement::status))
    }

    /// `true` if the cell holds a complete statement
    pub fn is_filled(&self, key: &CellKey) -> bool {
        self.lock()
            .current
            .as_ref()
            .is_some_and(|d| d.ledger().is_filled(key))
    }

    pub fn open_statement(&self, key: &CellKey) -> Result<OpenOutcome, StoreError> {
        self.with_debate_mut(|d| d.open_statement(key, Utc::now()))
    }

    pub fn update_statement(&self, key: &CellKey, content: String) -> Result<(), StoreError> {
        self.with_debate_mut(|d| d.update_statement(key, content))
    }

    pub fn complete_statement(
        &self,
        key: &CellKey,
        final_text: Option<String>,
    ) -> Result<bool, StoreError> {
        self.with_debate_mut(|d| d.complete_statement(key, final_text))
    }

    pub fn fail_statement(&self, key: &CellKey) -> Result<(), StoreError> {
        self.with_debate_mut(|d| d.fail_statement(key))
    }

    pub fn set_current_round(&self, round: Round) -> Result<(), StoreError> {
        self.with_debate_mut(|d| {
            d.set_current_round(round);
            Ok(())
        })
    }

    pub fn mark_complete(&self) -> Result<(), StoreError> {
        self.with_debate_mut(Debate::mark_complete)
    }

    pub fn cast_vote(
        &self,
        expert_id: &debate_domain::ExpertId,
        policy: BallotPolicy,
    ) -> Result<u32, StoreError> {
        self.with_debate_mut(|d| d.cast_vote(expert_id, policy))
    }

    pub fn attach_summary(&self, summary: DebateSummary) -> Result<(), StoreError> {
        self.with_debate_mut(|d| d.attach_summary(summary))
    }

    /// Claim the summary request for the live debate.
    ///
    /// Rejected with `AlreadySummarized` while another request holds the
    /// reservation, so the summarizer runs at most once at a time. The
    /// reservation is released when dropped.
    pub fn reserve_summary(&self) -> Result<SummaryReservation, StoreError> {
        let mut state = self.lock();
        let debate = state.current.as_ref().ok_or(StoreError::NoActiveDebate)?;
        if !debate.is_complete() {
            return Err(DomainError::DebateIncomplete.into());
        }
        if debate.summary().is_some() || state.summary_pending.as_ref() == Some(debate.id()) {
            return Err(DomainError::AlreadySummarized.into());
        }

        let snapshot = debate.clone();
        state.summary_pending = Some(snapshot.id().clone());
        Ok(SummaryReservation {
            store: self.clone(),
            debate: snapshot,
        })
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.lock().last_error = Some(message.into());
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    // ==================== History ====================

    /// Snapshot the live debate into the archive.
    ///
    /// Returns the commit outcome and the archive contents to persist.
    pub fn commit_current(&self) -> Result<(CommitOutcome, Vec<HistoryEntry>), StoreError> {
        let mut state = self.lock();
        let state = &mut *state;
        let debate = state.current.as_ref().ok_or(StoreError::NoActiveDebate)?;
        let outcome = state.history.commit(debate, Utc::now());
        Ok((outcome, state.history.entries().to_vec()))
    }

    pub fn is_archived(&self, id: &DebateId) -> bool {
        self.lock().history.get(id).is_some()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.lock().history.entries().to_vec()
    }

    pub fn replace_history(&self, history: HistoryArchive) {
        self.lock().history = history;
    }
}

/// Exclusive right to summarize one debate
#[derive(Debug)]
pub struct SummaryReservation {
    store: DebateStore,
    debate: Debate,
}

impl SummaryReservation {
    /// The debate as it was when reserved
    pub fn debate(&self) -> &Debate {
        &self.debate
    }
}

impl Drop for SummaryReservation {
    fn drop(&mut self) {
        let mut state = self.store.lock();
        if state.summary_pending.as_ref() == Some(self.debate.id()) {
            state.summary_pending = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_domain::{Expert, Panel, Stance, Topic};

    fn store_with_debate() -> DebateStore {
        let panel = Panel::new(vec![
            Expert::new("a", "Ada", Stance::Pro),
            Expert::new("b", "Bo", Stance::Con),
        ])
        .unwrap();
        let store = DebateStore::new();
        store.set_current(Debate::new(Topic::new("t", "Nuclear power").unwrap(), panel));
        store
    }

    #[test]
    fn test_writes_without_debate_fail() {
        let store = DebateStore::new();
        let key = CellKey::new("a", Round::Opening);
        assert_eq!(store.open_statement(&key), Err(StoreError::NoActiveDebate));
        assert!(!store.is_filled(&key));
        assert!(store.commit_current().is_err());
    }

    #[test]
    fn test_statement_lifecycle_through_store() {
        let store = store_with_debate();
        let key = CellKey::new("a", Round::Opening);

        assert_eq!(store.open_statement(&key), Ok(OpenOutcome::Created));
        assert_eq!(store.statement_status(&key), Some(StatementStatus::Streaming));
        store.update_statement(&key, "Hel".to_string()).unwrap();
        store.update_statement(&key, "Hello".to_string()).unwrap();
        assert!(!store.is_filled(&key));
        store.complete_statement(&key, None).unwrap();

        assert!(store.is_filled(&key));
        assert_eq!(store.statement(&key).unwrap().content(), "Hello");
    }

    #[test]
    fn test_clones_share_state() {
        let store = store_with_debate();
        let other = store.clone();
        let key = CellKey::new("b", Round::Opening);
        other.open_statement(&key).unwrap();
        assert_eq!(store.statement_status(&key), Some(StatementStatus::Streaming));
    }

    #[test]
    fn test_set_current_clears_error() {
        let store = store_with_debate();
        store.set_error("boom");
        assert_eq!(store.last_error().as_deref(), Some("boom"));
        let debate = store.current_snapshot().unwrap();
        store.set_current(debate);
        assert!(store.last_error().is_none());
    }

    #[test]
    fn test_commit_current_snapshots() {
        let store = store_with_debate();
        let id = store.current_id().unwrap();
        let (outcome, entries) = store.commit_current().unwrap();

        assert!(!outcome.replaced);
        assert_eq!(entries.len(), 1);
        assert!(store.is_archived(&id));

        store.set_current_round(Round::Closing).unwrap();
        assert_eq!(
            store.history()[0].debate().current_round(),
            Round::Opening
        );
    }

    #[test]
    fn test_summary_reservation_is_exclusive() {
        let store = store_with_debate();
        assert_eq!(
            store.reserve_summary().unwrap_err(),
            StoreError::Domain(DomainError::DebateIncomplete)
        );

        store.mark_complete().unwrap();
        let reservation = store.reserve_summary().unwrap();
        assert_eq!(
            store.reserve_summary().unwrap_err(),
            StoreError::Domain(DomainError::AlreadySummarized)
        );

        drop(reservation);
        assert!(store.reserve_summary().is_ok());
    }
}
