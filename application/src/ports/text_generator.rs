//! Text generator port
//!
//! Defines the interface for the external collaborator that writes each
//! expert's statement.

use async_trait::async_trait;
use debate_domain::{Expert, Round, StreamEvent, Topic};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur while generating a statement
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Stream failed: {0}")]
    StreamFailed(String),

    #[error("Unparsable output: {0}")]
    InvalidOutput(String),

    #[error("Stream ended without a completion event")]
    StreamClosed,
}

/// Everything the generator needs to write one statement
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub expert: Expert,
    pub topic: Topic,
    pub round: Round,
    /// Earlier complete statements in this round, as (speaker name, content)
    pub prior_statements: Vec<(String, String)>,
    /// Everyone else on the panel, in panel order
    pub other_experts: Vec<Expert>,
}

/// Handle for receiving streaming events from a generator.
///
/// Wraps an `mpsc::Receiver<StreamEvent>`: a lazy, finite, non-restartable
/// sequence of fragments that ends with a terminal event.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Wait for the next event; `None` once the sender is gone.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        self.receiver.recv().await
    }

    /// Consume the stream and collect all text into a single string.
    ///
    /// Useful when streaming is only a transport detail (e.g. summaries).
    pub async fn collect_text(mut self) -> Result<String, GenerationError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => {
                    return Err(GenerationError::StreamFailed(e));
                }
            }
        }
        Err(GenerationError::StreamClosed)
    }
}

/// Generator for debate statements
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Start generating one statement.
    ///
    /// Returns as soon as the stream is open; fragments are pulled from the
    /// returned handle.
    async fn stream_statement(
        &self,
        request: GenerationRequest,
    ) -> Result<StreamHandle, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_text_concatenates_deltas() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Delta("Hello ".to_string())).await.unwrap();
        tx.send(StreamEvent::Delta("world".to_string())).await.unwrap();
        tx.send(StreamEvent::Completed("Hello world".to_string()))
            .await
            .unwrap();

        let text = StreamHandle::new(rx).collect_text().await.unwrap();
        assert_eq!(text, "Hello world");
    }

    #[tokio::test]
    async fn test_collect_text_surfaces_error() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Delta("Hel".to_string())).await.unwrap();
        tx.send(StreamEvent::Error("upstream reset".to_string()))
            .await
            .unwrap();

        let err = StreamHandle::new(rx).collect_text().await.unwrap_err();
        assert_eq!(err, GenerationError::StreamFailed("upstream reset".to_string()));
    }

    #[tokio::test]
    async fn test_collect_text_closed_without_completion() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Delta("partial".to_string())).await.unwrap();
        drop(tx);

        let err = StreamHandle::new(rx).collect_text().await.unwrap_err();
        assert_eq!(err, GenerationError::StreamClosed);
    }
}
