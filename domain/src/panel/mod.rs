//! Debate panel domain.
//!
//! - [`entities::Expert`]: a participant and their profile
//! - [`entities::Panel`]: the fixed, ordered set of participants
//! - [`value_objects::Stance`]: pro / con / neutral

pub mod entities;
pub mod value_objects;

pub use entities::{Expert, Panel};
pub use value_objects::{ExpertId, Stance};
