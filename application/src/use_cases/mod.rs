//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod finalize_debate;
pub mod run_debate;
pub mod start_debate;
