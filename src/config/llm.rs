//! LLM collaborator configuration.

use serde::Deserialize;
use std::time::Duration;

/// LLM configuration
///
/// A missing API key is not a validation error: the dispatcher runs
/// without the collaborator and relies on lexical scoring instead.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// OpenAI API key. Absent means the collaborator stays disabled.
    pub openai_api_key: Option<String>,

    /// Model to use.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL for the API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// System prompt override.
    pub system_prompt: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the API key if one is configured and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key.as_deref().filter(|k| !k.is_empty())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            system_prompt: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}
