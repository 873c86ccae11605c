//! OpenAI-compatible chat completions adapter.
//!
//! Works with any server exposing `POST {base_url}/chat/completions` with
//! `stream: true` (OpenAI, Ollama, vLLM, LM Studio, ...). Statements are
//! streamed; summaries use a single non-streaming request.

use super::sse::{SseEvent, SseParser};
use crate::config::FileGeneratorConfig;
use async_trait::async_trait;
use debate_application::ports::summarizer::{DebateSummarizer, SummaryError};
use debate_application::ports::text_generator::{
    GenerationError, GenerationRequest, StreamHandle, TextGenerator,
};
use debate_domain::{Debate, DebatePromptTemplate, DebateSummary, StreamEvent};
use futures::{Stream, StreamExt};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Buffered events between the HTTP reader task and the accumulator
const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

/// Client for an OpenAI-compatible endpoint
#[derive(Debug, Clone)]
pub struct OpenAiTextGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiTextGenerator {
    pub fn new(config: &FileGeneratorConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| GenerationError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: config.resolve_api_key(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn post(
        &self,
        system: &str,
        user: &str,
        stream: bool,
    ) -> Result<reqwest::Response, GenerationError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GenerationError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::RequestFailed(format!(
                "{} returned {}: {}",
                self.endpoint, status, body
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl TextGenerator for OpenAiTextGenerator {
    async fn stream_statement(
        &self,
        request: GenerationRequest,
    ) -> Result<StreamHandle, GenerationError> {
        let system = DebatePromptTemplate::persona_system(&request.expert);
        let user = DebatePromptTemplate::statement_prompt(
            &request.expert,
            &request.topic,
            request.round,
            &request.prior_statements,
            &request.other_experts,
        );

        debug!(
            "Requesting {} statement from {} ({})",
            request.round, request.expert.id, self.model
        );
        let response = self.post(&system, &user, true).await?;

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        tokio::spawn(pump_stream(response, tx));
        Ok(StreamHandle::new(rx))
    }
}

/// Forward SSE fragments to `tx` until the body ends.
///
/// Always finishes with exactly one terminal event unless the receiver is
/// gone.
async fn pump_stream(response: reqwest::Response, tx: mpsc::Sender<StreamEvent>) {
    pump_body(response.bytes_stream(), tx).await;
}

async fn pump_body<S, B, E>(body: S, tx: mpsc::Sender<StreamEvent>)
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut body = std::pin::pin!(body);
    let mut parser = SseParser::new();
    let mut full_text = String::new();

    while let Some(chunk) = body.next().await {
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Statement stream interrupted: {}", e);
                let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                return;
            }
        };

        for event in parser.feed(bytes.as_ref()) {
            if !forward(event, &tx, &mut full_text).await {
                return;
            }
        }
    }

    if let Some(event) = parser.flush()
        && !forward(event, &tx, &mut full_text).await
    {
        return;
    }

    warn!(
        "Statement stream ended without [DONE] after {} bytes",
        full_text.len()
    );
    let _ = tx
        .send(StreamEvent::Error("stream ended without [DONE]".to_string()))
        .await;
}

/// Returns `false` once the stream is finished or the receiver is gone.
async fn forward(event: SseEvent, tx: &mpsc::Sender<StreamEvent>, full_text: &mut String) -> bool {
    match event {
        SseEvent::Delta(fragment) => {
            full_text.push_str(&fragment);
            tx.send(StreamEvent::Delta(fragment)).await.is_ok()
        }
        SseEvent::Done => {
            let _ = tx
                .send(StreamEvent::Completed(std::mem::take(full_text)))
                .await;
            false
        }
        SseEvent::Error(message) => {
            warn!("Statement stream failed: {}", message);
            let _ = tx.send(StreamEvent::Error(message)).await;
            false
        }
    }
}

#[async_trait]
impl DebateSummarizer for OpenAiTextGenerator {
    async fn summarize(&self, debate: &Debate) -> Result<DebateSummary, SummaryError> {
        let prompt = DebatePromptTemplate::summary_prompt(debate);
        let response = self
            .post(DebatePromptTemplate::summary_system(), &prompt, false)
            .await
            .map_err(|e| SummaryError::RequestFailed(e.to_string()))?;

        let value: Value = response
            .json()
            .await
            .map_err(|e| SummaryError::InvalidOutput(e.to_string()))?;
        let content = value
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
            .ok_or_else(|| SummaryError::InvalidOutput("response has no message content".into()))?;

        parse_summary(content)
    }
}

/// Parse the summary JSON, tolerating markdown fences and chatter around it
pub fn parse_summary(content: &str) -> Result<DebateSummary, SummaryError> {
    let start = content.find('{');
    let end = content.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &content[start..=end],
        _ => {
            return Err(SummaryError::InvalidOutput(
                "no JSON object in summary response".to_string(),
            ));
        }
    };

    serde_json::from_str(json).map_err(|e| SummaryError::InvalidOutput(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_summary_plain_json() {
        let summary = parse_summary(
            r#"{"summary":"Both sides were strong.","verdict":"Con","keyTakeaways":["Cost","Risk"]}"#,
        )
        .unwrap();
        assert_eq!(summary.verdict, "Con");
        assert_eq!(summary.key_takeaways, vec!["Cost", "Risk"]);
    }

    #[test]
    fn test_parse_summary_inside_markdown_fence() {
        let content = "Here you go:\n```json\n{\"summary\": \"s\", \"verdict\": \"v\"}\n```";
        let summary = parse_summary(content).unwrap();
        assert_eq!(summary.summary, "s");
        assert!(summary.key_takeaways.is_empty());
    }

    #[test]
    fn test_parse_summary_rejects_prose() {
        assert!(matches!(
            parse_summary("I think the pro side won."),
            Err(SummaryError::InvalidOutput(_))
        ));
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let config = FileGeneratorConfig {
            base_url: "http://localhost:11434/v1/".to_string(),
            api_key: Some("k".to_string()),
            ..FileGeneratorConfig::default()
        };
        let generator = OpenAiTextGenerator::new(&config).unwrap();
        assert_eq!(generator.endpoint, "http://localhost:11434/v1/chat/completions");
        assert_eq!(generator.api_key.as_deref(), Some("k"));
    }

    #[tokio::test]
    async fn test_forward_done_sends_full_text() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut full = String::new();

        assert!(forward(SseEvent::Delta("Hi ".into()), &tx, &mut full).await);
        assert!(forward(SseEvent::Delta("there".into()), &tx, &mut full).await);
        assert!(!forward(SseEvent::Done, &tx, &mut full).await);

        assert_eq!(rx.recv().await, Some(StreamEvent::Delta("Hi ".into())));
        assert_eq!(rx.recv().await, Some(StreamEvent::Delta("there".into())));
        assert_eq!(
            rx.recv().await,
            Some(StreamEvent::Completed("Hi there".into()))
        );
    }

    async fn drain(chunks: Vec<&'static str>) -> Vec<StreamEvent> {
        let (tx, mut rx) = mpsc::channel(16);
        let body = futures::stream::iter(chunks.into_iter().map(Ok::<_, String>));
        pump_body(body, tx).await;

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_pump_completes_on_done() {
        let events = drain(vec![
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\n",
            "data: [DONE]\n\n",
        ])
        .await;
        assert_eq!(
            events,
            vec![
                StreamEvent::Delta("Hi".into()),
                StreamEvent::Completed("Hi".into())
            ]
        );
    }

    #[tokio::test]
    async fn test_pump_reports_truncated_body() {
        let events = drain(vec![
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
        ])
        .await;
        assert_eq!(
            events,
            vec![
                StreamEvent::Delta("Hel".into()),
                StreamEvent::Error("stream ended without [DONE]".into())
            ]
        );
    }

    #[tokio::test]
    async fn test_pump_stops_at_malformed_chunk() {
        let events = drain(vec![
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"cont\n\n",
            "data: [DONE]\n\n",
        ])
        .await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], StreamEvent::Delta("Hel".into()));
        assert!(matches!(&events[1], StreamEvent::Error(m) if m.starts_with("malformed")));
    }
}
