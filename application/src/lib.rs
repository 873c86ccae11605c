//! Application layer for expert-debate
//!
//! This crate contains use cases, port definitions, the shared debate store
//! and application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod store;
pub mod use_cases;

// Re-export commonly used types
pub use config::SchedulingParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    history_store::{HistoryStore, HistoryStoreError, NoHistoryStore},
    panel_source::{PanelError, PanelOptions, PanelSource},
    progress::{DebateProgressNotifier, NoProgress},
    summarizer::{DebateSummarizer, SummaryError},
    text_generator::{GenerationError, GenerationRequest, StreamHandle, TextGenerator},
};
pub use store::{DebateState, DebateStore, StoreError, SummaryReservation};
pub use use_cases::finalize_debate::{FinalizeDebateUseCase, FinalizeError, VoteReceipt};
pub use use_cases::run_debate::{
    DebateOutcome, GenerationGuard, GuardDecision, RunDebateError, StepOutcome,
    StreamingAccumulator, TurnScheduler,
};
pub use use_cases::start_debate::{StartDebateError, StartDebateUseCase};
