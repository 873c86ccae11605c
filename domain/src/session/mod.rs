//! Generator session domain.
//!
//! - [`stream::StreamEvent`]: one event of a streaming statement

pub mod stream;
