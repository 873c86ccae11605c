//! Progress notification port
//!
//! Defines the interface for reporting progress while a debate runs.

use debate_domain::{CellKey, Expert, Round};

/// Callback for progress updates during a debate
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait DebateProgressNotifier: Send + Sync {
    /// Called when the scheduler enters a new round
    fn on_round_start(&self, round: Round, panel_size: usize);

    /// Called when an expert starts speaking, before the first fragment
    fn on_statement_start(&self, expert: &Expert, round: Round);

    /// Called when an expert's statement ends
    fn on_statement_end(&self, key: &CellKey, success: bool);

    /// Called once every cell is spoken
    fn on_debate_complete(&self);

    // ==================== Stream Callbacks ====================

    /// Called for each text fragment as it arrives.
    fn on_statement_chunk(&self, _key: &CellKey, _chunk: &str) {}

    /// Called when the end-of-stream cleanup changed the statement text.
    fn on_statement_normalized(&self, _key: &CellKey, _content: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DebateProgressNotifier for NoProgress {
    fn on_round_start(&self, _round: Round, _panel_size: usize) {}
    fn on_statement_start(&self, _expert: &Expert, _round: Round) {}
    fn on_statement_end(&self, _key: &CellKey, _success: bool) {}
    fn on_debate_complete(&self) {}
}
