//! Core domain concepts shared across all subdomains.
//!
//! - [`round::Round`]: the fixed sequence of debate rounds
//! - [`topic::Topic`]: the subject under debate
//! - [`output_format::OutputFormat`]: how a finished debate is rendered
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod output_format;
pub mod round;
pub mod topic;
