//! Application-level configuration.
//!
//! - [`SchedulingParams`]: auto-advance pacing and ballot policy

pub mod scheduling_params;

pub use scheduling_params::SchedulingParams;
