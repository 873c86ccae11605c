//! Text generator configuration from TOML (`[generator]` section)

use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat completions endpoint used for statements and
/// summaries.
///
/// # Example
///
/// ```toml
/// [generator]
/// base_url = "http://localhost:11434/v1"
/// model = "llama3.1"
/// api_key_env = "OPENAI_API_KEY"
/// temperature = 0.8
/// max_tokens = 600
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeneratorConfig {
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Direct API key; prefer the environment variable named by `api_key_env`.
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for FileGeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            temperature: 0.8,
            max_tokens: 600,
            timeout_seconds: 60,
        }
    }
}

impl FileGeneratorConfig {
    /// API key from the config file or the configured environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }
}
