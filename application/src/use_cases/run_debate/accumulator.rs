//! Streaming accumulator: turns a fragment stream into one ledger statement.

use super::types::RunDebateError;
use crate::ports::progress::DebateProgressNotifier;
use crate::ports::text_generator::{GenerationError, StreamHandle};
use crate::store::DebateStore;
use debate_domain::{CellKey, OpenOutcome, StreamEvent, normalize_statement};
use tracing::debug;

/// Text produced for one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccumulatedStatement {
    pub content: String,
    /// `true` when end-of-stream cleanup changed the text
    pub normalized: bool,
}

/// Applies stream fragments to the ledger in arrival order.
///
/// Each fragment replaces the statement content with the full text so far,
/// so readers of the store always see a single, growing statement.
#[derive(Debug, Clone)]
pub struct StreamingAccumulator {
    store: DebateStore,
}

impl StreamingAccumulator {
    pub fn new(store: DebateStore) -> Self {
        Self { store }
    }

    /// Create (or reopen) the empty streaming statement for `key`.
    ///
    /// Called before the first fragment is requested.
    pub fn open(&self, key: &CellKey) -> Result<OpenOutcome, RunDebateError> {
        Ok(self.store.open_statement(key)?)
    }

    /// Drain `handle` into the statement for `key`.
    ///
    /// On error the partial content stays in the ledger and the statement is
    /// marked failed.
    pub async fn drain(
        &self,
        key: &CellKey,
        speaker: &str,
        mut handle: StreamHandle,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<AccumulatedStatement, RunDebateError> {
        let mut content = String::new();

        loop {
            match handle.next_event().await {
                Some(StreamEvent::Delta(fragment)) => {
                    content.push_str(&fragment);
                    self.store.update_statement(key, content.clone())?;
                    progress.on_statement_chunk(key, &fragment);
                }
                Some(StreamEvent::Completed(full_text)) => {
                    let source = if full_text.is_empty() {
                        content.as_str()
                    } else {
                        full_text.as_str()
                    };
                    let cleaned = normalize_statement(source, Some(speaker));
                    let normalized = cleaned != content;
                    let replaced = self.store.complete_statement(key, Some(cleaned.clone()))?;
                    if replaced {
                        progress.on_statement_normalized(key, &cleaned);
                    }
                    debug!("Statement {} complete ({} bytes)", key, cleaned.len());
                    return Ok(AccumulatedStatement {
                        content: cleaned,
                        normalized,
                    });
                }
                Some(StreamEvent::Error(message)) => {
                    self.store.fail_statement(key)?;
                    return Err(GenerationError::StreamFailed(message).into());
                }
                None => {
                    self.store.fail_statement(key)?;
                    return Err(GenerationError::StreamClosed.into());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use debate_domain::{Debate, Expert, Panel, Round, Stance, StatementStatus, Topic};
    use tokio::sync::mpsc;

    fn setup() -> (StreamingAccumulator, DebateStore, CellKey) {
        let panel = Panel::new(vec![
            Expert::new("a", "Ada", Stance::Pro),
            Expert::new("b", "Bo", Stance::Con),
        ])
        .unwrap();
        let store = DebateStore::new();
        store.set_current(Debate::new(Topic::new("t", "Space mining").unwrap(), panel));
        let key = CellKey::new("b", Round::Arguments);
        (StreamingAccumulator::new(store.clone()), store, key)
    }

    fn handle(events: Vec<StreamEvent>) -> StreamHandle {
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            tx.try_send(event).unwrap();
        }
        StreamHandle::new(rx)
    }

    #[tokio::test]
    async fn test_fragments_accumulate_into_one_statement() {
        let (acc, store, key) = setup();
        acc.open(&key).unwrap();

        let result = acc
            .drain(
                &key,
                "Bo",
                handle(vec![
                    StreamEvent::Delta("Mining ".into()),
                    StreamEvent::Delta("pays.".into()),
                    StreamEvent::Completed(String::new()),
                ]),
                &NoProgress,
            )
            .await
            .unwrap();

        assert_eq!(result.content, "Mining pays.");
        assert!(!result.normalized);
        let statement = store.statement(&key).unwrap();
        assert_eq!(statement.content(), "Mining pays.");
        assert!(statement.is_complete());
        assert_eq!(store.with_debate(|d| d.ledger().len()).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_completion_text_is_normalized() {
        let (acc, store, key) = setup();
        acc.open(&key).unwrap();

        let result = acc
            .drain(
                &key,
                "Bo",
                handle(vec![
                    StreamEvent::Delta("*leans in* Bo: ".into()),
                    StreamEvent::Delta("It pays.".into()),
                    StreamEvent::Completed("*leans in* Bo: It pays.".into()),
                ]),
                &NoProgress,
            )
            .await
            .unwrap();

        assert_eq!(result.content, "It pays.");
        assert!(result.normalized);
        assert_eq!(store.statement(&key).unwrap().content(), "It pays.");
    }

    #[tokio::test]
    async fn test_error_keeps_partial_and_marks_failed() {
        let (acc, store, key) = setup();
        acc.open(&key).unwrap();

        let err = acc
            .drain(
                &key,
                "Bo",
                handle(vec![
                    StreamEvent::Delta("Hello ".into()),
                    StreamEvent::Delta("wor".into()),
                    StreamEvent::Error("connection reset".into()),
                ]),
                &NoProgress,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunDebateError::Generation(GenerationError::StreamFailed(_))
        ));
        let statement = store.statement(&key).unwrap();
        assert_eq!(statement.content(), "Hello wor");
        assert_eq!(statement.status(), StatementStatus::Failed);
    }

    #[tokio::test]
    async fn test_closed_stream_is_a_failure() {
        let (acc, store, key) = setup();
        acc.open(&key).unwrap();

        let err = acc
            .drain(
                &key,
                "Bo",
                handle(vec![StreamEvent::Delta("Half".into())]),
                &NoProgress,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunDebateError::Generation(GenerationError::StreamClosed)
        ));
        assert!(store.statement(&key).unwrap().is_failed());
    }
}
