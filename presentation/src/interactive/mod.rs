//! Terminal prompts for manual mode and voting.

mod continue_prompt;
mod vote_prompt;

pub use continue_prompt::{ContinueDecision, parse_continue, wait_for_continue};
pub use vote_prompt::{parse_ballot, prompt_vote};
