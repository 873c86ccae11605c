//! Finalize Debate use case
//!
//! Everything that happens after the last statement: voting, finishing
//! without a vote, the optional summary, and archiving to history.
//!
//! A debate is archived on its first vote or when finished without voting.
//! Later changes (more votes, a summary) re-commit the same entry.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::history_store::{HistoryStore, HistoryStoreError};
use crate::ports::summarizer::{DebateSummarizer, SummaryError};
use crate::store::{DebateStore, StoreError};
use debate_domain::{
    BallotPolicy, CommitOutcome, DebateSummary, DomainError, ExpertId, HistoryArchive, Standing,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum FinalizeError {
    #[error(transparent)]
    State(#[from] StoreError),

    #[error("Summary failed: {0}")]
    Summary(#[from] SummaryError),

    #[error("Could not persist history: {0}")]
    Persist(#[from] HistoryStoreError),
}

impl FinalizeError {
    /// `true` when the debate state rejected the action, e.g. a second
    /// ballot or a vote on an unfinished debate
    pub fn is_rejected(&self) -> bool {
        matches!(self, FinalizeError::State(StoreError::Domain(_)))
    }
}

/// Result of a successful vote
#[derive(Debug, Clone, PartialEq)]
pub struct VoteReceipt {
    pub expert_id: ExpertId,
    pub count: u32,
    pub standings: Vec<Standing>,
}

/// Use case for closing out a finished debate
pub struct FinalizeDebateUseCase {
    store: DebateStore,
    history_store: Arc<dyn HistoryStore>,
    policy: BallotPolicy,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl FinalizeDebateUseCase {
    pub fn new(store: DebateStore, history_store: Arc<dyn HistoryStore>) -> Self {
        Self {
            store,
            history_store,
            policy: BallotPolicy::default(),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_policy(mut self, policy: BallotPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set a conversation logger for structured transcript logging.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Load the persisted archive into the store. Returns the entry count.
    pub fn restore_history(&self) -> Result<usize, FinalizeError> {
        let entries = self.history_store.load()?;
        let archive = HistoryArchive::from_entries(entries);
        let count = archive.len();
        self.store.replace_history(archive);
        info!("Restored {} archived debates", count);
        Ok(count)
    }

    /// Cast a vote for `expert_id` and archive the debate.
    pub fn cast_vote(&self, expert_id: &ExpertId) -> Result<VoteReceipt, FinalizeError> {
        let count = self.store.cast_vote(expert_id, self.policy)?;
        let (debate_id, standings) = self
            .store
            .with_debate(|d| (d.id().clone(), d.standings()))?;

        info!("Vote cast for {} ({} total)", expert_id, count);
        self.conversation_logger
            .log(ConversationEvent::vote_cast(&debate_id, expert_id, count));

        self.archive()?;
        Ok(VoteReceipt {
            expert_id: expert_id.clone(),
            count,
            standings,
        })
    }

    /// Archive a completed debate without voting. No-op if already archived.
    pub fn finish(&self) -> Result<Option<CommitOutcome>, FinalizeError> {
        let (debate_id, complete) = self
            .store
            .with_debate(|d| (d.id().clone(), d.is_complete()))?;
        if !complete {
            return Err(StoreError::Domain(DomainError::DebateIncomplete).into());
        }
        if self.store.is_archived(&debate_id) {
            return Ok(None);
        }
        self.archive().map(Some)
    }

    /// Request, attach and archive the summary. At most once per debate.
    ///
    /// A concurrent second call is rejected without reaching the
    /// summarizer. A failed request can be retried.
    pub async fn summarize<S: DebateSummarizer + ?Sized>(
        &self,
        summarizer: &S,
    ) -> Result<DebateSummary, FinalizeError> {
        let reservation = self.store.reserve_summary()?;
        let debate = reservation.debate();

        let summary = match summarizer.summarize(debate).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Summary for {} failed: {}", debate.id(), e);
                self.store.set_error(e.to_string());
                return Err(e.into());
            }
        };

        self.store.attach_summary(summary.clone())?;
        self.conversation_logger
            .log(ConversationEvent::summary_attached(debate.id(), &summary.verdict));

        if self.store.is_archived(debate.id()) {
            self.archive()?;
        }
        Ok(summary)
    }

    fn archive(&self) -> Result<CommitOutcome, FinalizeError> {
        let (outcome, entries) = self.store.commit_current()?;
        if let Some(id) = self.store.current_id() {
            self.conversation_logger.log(ConversationEvent::debate_archived(
                &id,
                entries.len(),
                outcome.evicted,
            ));
            info!(
                "Archived debate {} ({} in history, {} evicted)",
                id,
                entries.len(),
                outcome.evicted
            );
        }
        self.history_store.save(&entries)?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::history_store::NoHistoryStore;
    use async_trait::async_trait;
    use debate_domain::{
        CellKey, Debate, Expert, HistoryEntry, Panel, Round, Stance, Topic,
    };
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MemoryHistoryStore {
        saved: Mutex<Vec<Vec<HistoryEntry>>>,
    }

    impl MemoryHistoryStore {
        fn save_count(&self) -> usize {
            self.saved.lock().unwrap().len()
        }

        fn last(&self) -> Vec<HistoryEntry> {
            self.saved.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    impl HistoryStore for MemoryHistoryStore {
        fn load(&self) -> Result<Vec<HistoryEntry>, HistoryStoreError> {
            Ok(self.last())
        }

        fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryStoreError> {
            self.saved.lock().unwrap().push(entries.to_vec());
            Ok(())
        }
    }

    struct FixedSummarizer(Result<DebateSummary, SummaryError>);

    #[async_trait]
    impl DebateSummarizer for FixedSummarizer {
        async fn summarize(
            &self,
            _debate: &debate_domain::Debate,
        ) -> Result<DebateSummary, SummaryError> {
            self.0.clone()
        }
    }

    /// Summarizer that yields once mid-request and counts its calls
    #[derive(Default)]
    struct SlowSummarizer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DebateSummarizer for SlowSummarizer {
        async fn summarize(
            &self,
            _debate: &debate_domain::Debate,
        ) -> Result<DebateSummary, SummaryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok(DebateSummary::new("Even.", "Draw"))
        }
    }

    fn debate(title: &str, complete: bool) -> Debate {
        let panel = Panel::new(vec![
            Expert::new("a", "Ada", Stance::Pro),
            Expert::new("b", "Bo", Stance::Con),
        ])
        .unwrap();
        let mut debate = Debate::new(Topic::new(title, title).unwrap(), panel);
        if complete {
            for round in Round::ALL {
                for id in ["a", "b"] {
                    let key = CellKey::new(id, round);
                    debate.open_statement(&key, chrono::Utc::now()).unwrap();
                    debate
                        .complete_statement(&key, Some(format!("{} speaks", id)))
                        .unwrap();
                }
            }
            debate.mark_complete().unwrap();
        }
        debate
    }

    fn setup(complete: bool) -> (FinalizeDebateUseCase, DebateStore, Arc<MemoryHistoryStore>) {
        let store = DebateStore::new();
        store.set_current(debate("Four-day work week", complete));
        let history = Arc::new(MemoryHistoryStore::default());
        let use_case = FinalizeDebateUseCase::new(store.clone(), history.clone());
        (use_case, store, history)
    }

    #[test]
    fn test_vote_archives_and_persists() {
        let (use_case, store, history) = setup(true);

        let receipt = use_case.cast_vote(&ExpertId::from("b")).unwrap();

        assert_eq!(receipt.count, 1);
        assert_eq!(receipt.standings[0].expert_id, ExpertId::from("b"));
        assert_eq!(store.history().len(), 1);
        assert_eq!(history.save_count(), 1);
        let archived = &history.last()[0];
        assert_eq!(
            archived.debate().winner().map(|e| e.id.as_str()),
            Some("b")
        );
    }

    #[test]
    fn test_second_vote_rejected_under_single_policy() {
        let (use_case, _, history) = setup(true);
        use_case.cast_vote(&ExpertId::from("a")).unwrap();

        let err = use_case.cast_vote(&ExpertId::from("b")).unwrap_err();
        assert!(err.is_rejected());
        assert_eq!(history.save_count(), 1);
    }

    #[test]
    fn test_unlimited_policy_recommits_same_entry() {
        let (use_case, store, history) = setup(true);
        let use_case = use_case.with_policy(BallotPolicy::Unlimited);

        use_case.cast_vote(&ExpertId::from("a")).unwrap();
        let receipt = use_case.cast_vote(&ExpertId::from("a")).unwrap();

        assert_eq!(receipt.count, 2);
        assert_eq!(store.history().len(), 1);
        assert_eq!(history.save_count(), 2);
    }

    #[test]
    fn test_vote_before_completion_rejected() {
        let (use_case, store, history) = setup(false);

        let err = use_case.cast_vote(&ExpertId::from("a")).unwrap_err();
        assert!(err.is_rejected());
        assert!(store.history().is_empty());
        assert_eq!(history.save_count(), 0);
    }

    #[test]
    fn test_finish_without_vote_archives_once() {
        let (use_case, store, history) = setup(true);

        assert!(use_case.finish().unwrap().is_some());
        assert!(use_case.finish().unwrap().is_none());

        assert_eq!(store.history().len(), 1);
        assert!(store.history()[0].debate().winner().is_none());
        assert_eq!(history.save_count(), 1);
    }

    #[test]
    fn test_finish_incomplete_rejected() {
        let (use_case, _, _) = setup(false);
        assert!(use_case.finish().unwrap_err().is_rejected());
    }

    #[tokio::test]
    async fn test_summary_is_attached_once_and_recommitted() {
        let (use_case, store, history) = setup(true);
        use_case.cast_vote(&ExpertId::from("a")).unwrap();
        let summarizer = FixedSummarizer(Ok(DebateSummary::new("Close call.", "Pro wins")));

        let summary = use_case.summarize(&summarizer).await.unwrap();
        assert_eq!(summary.verdict, "Pro wins");
        assert_eq!(history.save_count(), 2);
        assert_eq!(
            store.history()[0].debate().summary().map(|s| s.verdict.as_str()),
            Some("Pro wins")
        );

        let err = use_case.summarize(&summarizer).await.unwrap_err();
        assert!(err.is_rejected());
    }

    #[tokio::test]
    async fn test_summary_failure_leaves_debate_unchanged() {
        let (use_case, store, _) = setup(true);
        let summarizer = FixedSummarizer(Err(SummaryError::InvalidOutput("not json".into())));

        let err = use_case.summarize(&summarizer).await.unwrap_err();
        assert!(matches!(err, FinalizeError::Summary(_)));
        assert!(store.with_debate(|d| d.summary().is_none()).unwrap());
        assert!(store.last_error().is_some());

        let retry = FixedSummarizer(Ok(DebateSummary::new("Second try.", "Con wins")));
        assert_eq!(use_case.summarize(&retry).await.unwrap().verdict, "Con wins");
    }

    #[tokio::test]
    async fn test_concurrent_summaries_call_summarizer_once() {
        let (use_case, store, _) = setup(true);
        let summarizer = SlowSummarizer::default();

        let (first, second) = tokio::join!(
            use_case.summarize(&summarizer),
            use_case.summarize(&summarizer),
        );

        assert_eq!(first.unwrap().verdict, "Draw");
        assert!(second.unwrap_err().is_rejected());
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 1);
        assert!(store.with_debate(|d| d.summary().is_some()).unwrap());
    }

    #[test]
    fn test_history_keeps_ten_newest() {
        let store = DebateStore::new();
        let history = Arc::new(MemoryHistoryStore::default());
        let use_case = FinalizeDebateUseCase::new(store.clone(), history.clone());

        let mut first_id = None;
        for i in 0..11 {
            let debate = debate(&format!("Topic {}", i), true);
            first_id.get_or_insert_with(|| debate.id().clone());
            store.set_current(debate);
            use_case.finish().unwrap();
        }

        let entries = store.history();
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0].debate().topic().title, "Topic 10");
        assert!(entries.iter().all(|e| Some(e.id()) != first_id.as_ref()));
        assert_eq!(history.last().len(), 10);
    }

    #[test]
    fn test_restore_history_loads_persisted_entries() {
        let (use_case, store, history) = setup(true);
        use_case.finish().unwrap();
        store.replace_history(HistoryArchive::new());

        let fresh = FinalizeDebateUseCase::new(store.clone(), history);
        assert_eq!(fresh.restore_history().unwrap(), 1);
        assert_eq!(store.history().len(), 1);

        let empty = FinalizeDebateUseCase::new(store.clone(), Arc::new(NoHistoryStore));
        assert_eq!(empty.restore_history().unwrap(), 0);
    }
}
