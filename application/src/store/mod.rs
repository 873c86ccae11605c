//! Shared debate state.

pub mod debate_store;

pub use debate_store::{DebateState, DebateStore, StoreError, SummaryReservation};
