//! Text generation adapters.

mod openai;
mod sse;

pub use openai::{OpenAiTextGenerator, parse_summary};
pub use sse::{SseEvent, SseParser};
