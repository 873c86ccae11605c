//! Line-oriented parser for chat-completions server-sent events.
//!
//! Bytes arrive in arbitrary chunks; a `data:` line (or a multi-byte
//! character) may be split across two chunks, so raw bytes are buffered until
//! their newline arrives.

use serde_json::Value;

/// One decoded event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A text fragment from `choices[0].delta.content`
    Delta(String),
    /// The `[DONE]` sentinel
    Done,
    /// An `error` object sent in place of a chunk, or a chunk that is not JSON
    Error(String),
}

#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and return every event completed by them
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(event) = Self::parse_line(line.trim_end_matches(['\n', '\r'])) {
                events.push(event);
            }
        }
        events
    }

    /// Parse whatever is left once the body ends without a final newline
    pub fn flush(&mut self) -> Option<SseEvent> {
        let rest = std::mem::take(&mut self.buffer);
        Self::parse_line(String::from_utf8_lossy(&rest).trim())
    }

    fn parse_line(line: &str) -> Option<SseEvent> {
        if line.is_empty() || line.starts_with(':') {
            return None;
        }
        let data = line.strip_prefix("data:")?.trim();
        if data == "[DONE]" {
            return Some(SseEvent::Done);
        }

        let value: Value = match serde_json::from_str(data) {
            Ok(value) => value,
            Err(e) => return Some(SseEvent::Error(format!("malformed stream chunk: {}", e))),
        };
        if let Some(error) = value.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Some(SseEvent::Error(message));
        }

        value
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("delta"))
            .and_then(|d| d.get("content"))
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(|text| SseEvent::Delta(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str) -> String {
        format!(
            "data: {{\"choices\":[{{\"delta\":{{\"content\":\"{}\"}}}}]}}\n\n",
            text
        )
    }

    #[test]
    fn test_parses_deltas_and_done() {
        let mut parser = SseParser::new();
        let body = format!("{}{}data: [DONE]\n\n", chunk("Hello "), chunk("world"));

        assert_eq!(
            parser.feed(body.as_bytes()),
            vec![
                SseEvent::Delta("Hello ".to_string()),
                SseEvent::Delta("world".to_string()),
                SseEvent::Done,
            ]
        );
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut parser = SseParser::new();
        let line = chunk("split");
        let (first, second) = line.split_at(17);

        assert!(parser.feed(first.as_bytes()).is_empty());
        assert_eq!(
            parser.feed(second.as_bytes()),
            vec![SseEvent::Delta("split".to_string())]
        );
    }

    #[test]
    fn test_multibyte_character_split_across_chunks() {
        let mut parser = SseParser::new();
        let line = chunk("café");
        let bytes = line.as_bytes();
        let cut = line.find('é').unwrap() + 1;

        assert!(parser.feed(&bytes[..cut]).is_empty());
        assert_eq!(
            parser.feed(&bytes[cut..]),
            vec![SseEvent::Delta("café".to_string())]
        );
    }

    #[test]
    fn test_skips_comments_and_role_chunks() {
        let mut parser = SseParser::new();
        let body = ": keep-alive\n\ndata: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\r\n\r\n";
        assert!(parser.feed(body.as_bytes()).is_empty());
    }

    #[test]
    fn test_error_payload() {
        let mut parser = SseParser::new();
        let body = "data: {\"error\":{\"message\":\"rate limited\"}}\n";
        assert_eq!(
            parser.feed(body.as_bytes()),
            vec![SseEvent::Error("rate limited".to_string())]
        );
    }

    #[test]
    fn test_malformed_chunk_is_an_error() {
        let mut parser = SseParser::new();
        let body = format!(
            "{}data: {{\"choices\":[{{\"delta\":{{\"cont\n\ndata: [DONE]\n\n",
            chunk("Hel")
        );

        let events = parser.feed(body.as_bytes());
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], SseEvent::Delta("Hel".to_string()));
        assert!(matches!(&events[1], SseEvent::Error(m) if m.starts_with("malformed stream chunk")));
        assert_eq!(events[2], SseEvent::Done);
    }

    #[test]
    fn test_flush_parses_trailing_line() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"data: [DONE]").is_empty());
        assert_eq!(parser.flush(), Some(SseEvent::Done));
        assert_eq!(parser.flush(), None);
    }
}
