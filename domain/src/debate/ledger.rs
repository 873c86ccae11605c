//! Message ledger: the ordered, dedup-enforcing store of statements.
//!
//! The ledger is the single choke point for statement writes. It never holds
//! two statements for the same [`CellKey`], and it never rewrites a statement
//! that has been sealed as complete.

use super::cell::CellKey;
use super::statement::{Statement, StatementStatus};
use crate::core::error::DomainError;
use crate::core::round::Round;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of asking the ledger to open a cell for streaming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// A new empty statement was appended
    Created,
    /// A failed or orphaned statement was reset for another attempt
    Reopened,
    /// The cell already holds a complete statement; nothing changed
    AlreadyComplete,
}

/// Result of appending a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Inserted,
    /// A statement for the same cell exists; the append was ignored
    Duplicate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageLedger {
    statements: Vec<Statement>,
}

impl MessageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement unless its cell is already taken
    pub fn append(&mut self, statement: Statement) -> AppendOutcome {
        if self.contains(&statement.key()) {
            return AppendOutcome::Duplicate;
        }
        self.statements.push(statement);
        AppendOutcome::Inserted
    }

    /// Make sure the cell has a statement ready to receive fragments.
    ///
    /// A failed (or orphaned streaming) statement keeps its position and
    /// creation time; only its content and status are reset.
    pub fn open(&mut self, key: &CellKey, now: DateTime<Utc>) -> OpenOutcome {
        match self.get_mut(key) {
            Some(existing) if existing.is_complete() => OpenOutcome::AlreadyComplete,
            Some(existing) => {
                existing.set_content(String::new());
                existing.set_status(StatementStatus::Streaming);
                OpenOutcome::Reopened
            }
            None => {
                self.statements.push(Statement::streaming(key.clone(), now));
                OpenOutcome::Created
            }
        }
    }

    /// Replace the content of a statement that is still open
    pub fn update_content(
        &mut self,
        key: &CellKey,
        content: impl Into<String>,
    ) -> Result<(), DomainError> {
        let statement = self.open_statement_mut(key)?;
        statement.set_content(content.into());
        Ok(())
    }

    /// Seal a statement as complete.
    ///
    /// `final_text`, when it differs from the accumulated content, replaces it.
    /// Returns `true` if the content was replaced.
    pub fn complete(
        &mut self,
        key: &CellKey,
        final_text: Option<String>,
    ) -> Result<bool, DomainError> {
        let statement = self.open_statement_mut(key)?;
        let replaced = match final_text {
            Some(text) if text != statement.content() => {
                statement.set_content(text);
                true
            }
            _ => false,
        };
        statement.set_status(StatementStatus::Complete);
        Ok(replaced)
    }

    /// Flag a statement as failed, keeping its partial content
    pub fn mark_failed(&mut self, key: &CellKey) -> Result<(), DomainError> {
        let statement = self.open_statement_mut(key)?;
        statement.set_status(StatementStatus::Failed);
        Ok(())
    }

    pub fn get(&self, key: &CellKey) -> Option<&Statement> {
        self.statements.iter().find(|s| s.matches(key))
    }

    pub fn contains(&self, key: &CellKey) -> bool {
        self.get(key).is_some()
    }

    /// `true` if the cell holds a complete statement
    pub fn is_filled(&self, key: &CellKey) -> bool {
        self.get(key).is_some_and(Statement::is_complete)
    }

    /// Statements of one round, in the order they were created
    pub fn in_round(&self, round: Round) -> impl Iterator<Item = &Statement> {
        self.statements.iter().filter(move |s| s.round() == round)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn complete_count(&self) -> usize {
        self.statements.iter().filter(|s| s.is_complete()).count()
    }

    fn get_mut(&mut self, key: &CellKey) -> Option<&mut Statement> {
        self.statements.iter_mut().find(|s| s.matches(key))
    }

    fn open_statement_mut(&mut self, key: &CellKey) -> Result<&mut Statement, DomainError> {
        let statement = self
            .get_mut(key)
            .ok_or_else(|| DomainError::StatementNotFound(key.clone()))?;
        if statement.is_complete() {
            return Err(DomainError::StatementSealed(key.clone()));
        }
        Ok(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(id: &str, round: Round) -> CellKey {
        CellKey::new(id, round)
    }

    #[test]
    fn test_append_rejects_duplicate_cell() {
        let mut ledger = MessageLedger::new();
        let now = Utc::now();
        let k = key("a", Round::Opening);

        assert_eq!(
            ledger.append(Statement::complete(k.clone(), "first", now)),
            AppendOutcome::Inserted
        );
        assert_eq!(
            ledger.append(Statement::complete(k.clone(), "second", now)),
            AppendOutcome::Duplicate
        );
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(&k).unwrap().content(), "first");
    }

    #[test]
    fn test_open_creates_empty_streaming_statement() {
        let mut ledger = MessageLedger::new();
        let k = key("a", Round::Opening);

        assert_eq!(ledger.open(&k, Utc::now()), OpenOutcome::Created);
        let statement = ledger.get(&k).unwrap();
        assert!(statement.is_streaming());
        assert_eq!(statement.content(), "");
        assert!(!ledger.is_filled(&k));
    }

    #[test]
    fn test_open_complete_cell_is_noop() {
        let mut ledger = MessageLedger::new();
        let k = key("a", Round::Opening);
        ledger.open(&k, Utc::now());
        ledger.update_content(&k, "done").unwrap();
        ledger.complete(&k, None).unwrap();

        assert_eq!(ledger.open(&k, Utc::now()), OpenOutcome::AlreadyComplete);
        assert_eq!(ledger.get(&k).unwrap().content(), "done");
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_reopen_failed_keeps_single_statement() {
        let mut ledger = MessageLedger::new();
        let k = key("b", Round::Arguments);
        let created = Utc::now();
        ledger.open(&k, created);
        ledger.update_content(&k, "Hello wor").unwrap();
        ledger.mark_failed(&k).unwrap();
        assert!(ledger.get(&k).unwrap().is_failed());
        assert_eq!(ledger.get(&k).unwrap().content(), "Hello wor");

        assert_eq!(ledger.open(&k, Utc::now()), OpenOutcome::Reopened);
        let statement = ledger.get(&k).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(statement.content(), "");
        assert_eq!(statement.created_at(), created);
    }

    #[test]
    fn test_complete_replaces_only_when_different() {
        let mut ledger = MessageLedger::new();
        let k = key("a", Round::Closing);
        ledger.open(&k, Utc::now());
        ledger.update_content(&k, "  text ").unwrap();
        assert!(ledger.complete(&k, Some("text".to_string())).unwrap());

        let k2 = key("b", Round::Closing);
        ledger.open(&k2, Utc::now());
        ledger.update_content(&k2, "same").unwrap();
        assert!(!ledger.complete(&k2, Some("same".to_string())).unwrap());
        assert_eq!(ledger.complete_count(), 2);
    }

    #[test]
    fn test_sealed_statement_rejects_writes() {
        let mut ledger = MessageLedger::new();
        let k = key("a", Round::Opening);
        ledger.open(&k, Utc::now());
        ledger.complete(&k, None).unwrap();

        assert_eq!(
            ledger.update_content(&k, "late fragment"),
            Err(DomainError::StatementSealed(k.clone()))
        );
        assert_eq!(
            ledger.mark_failed(&k),
            Err(DomainError::StatementSealed(k.clone()))
        );
    }

    #[test]
    fn test_update_unknown_cell_fails() {
        let mut ledger = MessageLedger::new();
        let k = key("z", Round::Opening);
        assert_eq!(
            ledger.update_content(&k, "x"),
            Err(DomainError::StatementNotFound(k))
        );
    }

    #[test]
    fn test_in_round_filters() {
        let mut ledger = MessageLedger::new();
        let now = Utc::now();
        ledger.append(Statement::complete(key("a", Round::Opening), "1", now));
        ledger.append(Statement::complete(key("b", Round::Opening), "2", now));
        ledger.append(Statement::complete(key("a", Round::Arguments), "3", now));

        let opening: Vec<_> = ledger.in_round(Round::Opening).map(|s| s.content()).collect();
        assert_eq!(opening, vec!["1", "2"]);
    }
}
