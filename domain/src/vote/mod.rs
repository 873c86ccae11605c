//! Voting on a finished debate.

pub mod tally;

pub use tally::{BallotPolicy, Standing, VoteTally};
