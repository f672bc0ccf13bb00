//! OpenAI Client - Implementation of LlmClient against the chat completions
//! API.
//!
//! The tool catalog is exposed through the `tools` field in the OpenAI
//! function-calling format; the first tool call in the reply (if any) is
//! surfaced as a structured proposal.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAiConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_timeout(Duration::from_secs(20));
//!
//! let client = OpenAiClient::new(config);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::domain::session::{ChatMessage, MessageRole};
use crate::domain::tools::{ToolCatalog, ToolParams};
use crate::ports::{LlmClient, LlmReply, LlmToolCall, LlmUnavailable};

/// Default system prompt when none is configured.
const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful healthcare concierge assistant. \
     Use the provided tools when the user asks for an action you can perform. \
     Ask for missing details instead of guessing.";

/// Sampling temperature for tool selection. Low on purpose: proposals
/// should be stable across retries.
const TOOL_SELECTION_TEMPERATURE: f64 = 0.2;

/// Configuration for the OpenAI client.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g. "gpt-4o-mini").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// System prompt prepended to every conversation.
    pub system_prompt: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI chat-completions client.
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmUnavailable> {
        if config.api_key().is_empty() {
            return Err(LlmUnavailable::MissingCredentials);
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmUnavailable::Backend(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn to_wire_messages(&self, history: &[ChatMessage]) -> Vec<WireMessage> {
        let mut messages = vec![WireMessage {
            role: "system".to_string(),
            content: self.config.system_prompt.clone(),
        }];
        for msg in history {
            messages.push(WireMessage {
                role: match msg.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            });
        }
        messages
    }

    async fn send(&self, request: &WireRequest) -> Result<WireResponse, LlmUnavailable> {
        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmUnavailable::Backend(format!(
                        "request timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else {
                    LlmUnavailable::Backend(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(LlmUnavailable::MissingCredentials);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmUnavailable::Backend(format!(
                "status {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| LlmUnavailable::Backend(format!("malformed response: {e}")))
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn propose(
        &self,
        history: &[ChatMessage],
        catalog: &ToolCatalog,
    ) -> Result<LlmReply, LlmUnavailable> {
        let request = WireRequest {
            model: self.config.model.clone(),
            messages: self.to_wire_messages(history),
            temperature: Some(TOOL_SELECTION_TEMPERATURE),
            tools: Some(catalog.to_openai_tools()),
        };

        let response = self.send(&request).await?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmUnavailable::Backend("no choices in response".to_string()))?;

        let tool_call = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|call| LlmToolCall {
                name: call.function.name,
                arguments: parse_arguments(&call.function.arguments),
            });

        Ok(LlmReply {
            content: choice.message.content.unwrap_or_default(),
            tool_call,
        })
    }

    async fn summarize_execution(
        &self,
        history: &[ChatMessage],
        tool_name: &str,
        result: &serde_json::Value,
    ) -> Result<String, LlmUnavailable> {
        let mut messages = self.to_wire_messages(history);
        messages.push(WireMessage {
            role: "user".to_string(),
            content: format!(
                "The tool `{tool_name}` just returned this result: {result}. \
                 Summarize the outcome for the user in one or two short sentences."
            ),
        });

        let request = WireRequest {
            model: self.config.model.clone(),
            messages,
            temperature: Some(TOOL_SELECTION_TEMPERATURE),
            tools: None,
        };

        let response = self.send(&request).await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        Ok(content)
    }
}

/// Decodes the `arguments` field of a tool call.
///
/// The wire value is a JSON-encoded string. Anything that does not decode
/// to an object becomes an empty map; the slot-filling loop recovers the
/// values from the user instead.
fn parse_arguments(raw: &str) -> ToolParams {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
        return ToolParams::new();
    };
    let Some(object) = value.as_object() else {
        return ToolParams::new();
    };
    object
        .iter()
        .map(|(k, v)| {
            let rendered = match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), rendered)
        })
        .collect::<BTreeMap<_, _>>()
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireReplyMessage,
}

#[derive(Debug, Deserialize)]
struct WireReplyMessage {
    content: Option<String>,
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    function: WireFunction,
}

#[derive(Debug, Deserialize)]
struct WireFunction {
    name: String,
    arguments: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_works() {
        let config = OpenAiConfig::new("test-key")
            .with_model("gpt-4o")
            .with_base_url("https://custom.api.com/v1")
            .with_timeout(Duration::from_secs(10));

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "https://custom.api.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn empty_api_key_is_missing_credentials() {
        let result = OpenAiClient::new(OpenAiConfig::new(""));
        assert!(matches!(result, Err(LlmUnavailable::MissingCredentials)));
    }

    #[test]
    fn parse_arguments_decodes_object() {
        let args = parse_arguments(r#"{"patient_id": "pat_1", "retries": 3}"#);
        assert_eq!(args.get("patient_id").unwrap(), "pat_1");
        // Non-string values are rendered as JSON text.
        assert_eq!(args.get("retries").unwrap(), "3");
    }

    #[test]
    fn parse_arguments_rejects_non_objects() {
        assert!(parse_arguments(r#""just a string""#).is_empty());
        assert!(parse_arguments(r#"[1, 2, 3]"#).is_empty());
        assert!(parse_arguments("not json at all").is_empty());
    }

    #[test]
    fn wire_messages_start_with_system_prompt() {
        let config = OpenAiConfig::new("k").with_system_prompt("Be terse.");
        let client = OpenAiClient::new(config).unwrap();

        let history = vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")];
        let messages = client.to_wire_messages(&history);

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "Be terse.");
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[2].role, "assistant");
    }
}
