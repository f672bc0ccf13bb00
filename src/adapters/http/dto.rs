//! HTTP DTOs for the chat endpoint.
//!
//! The request and response shapes follow the OpenAI chat-completions
//! envelope so existing clients can point at this service unchanged; the
//! dispatch decision rides along in an extension field.

use serde::{Deserialize, Serialize};

use crate::domain::outcome::TurnOutcome;
use crate::domain::tools::ToolParams;

/// One message in the request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub role: String,
    pub content: String,
}

/// POST /v1/chat/completions request body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionRequest {
    /// Ignored; kept for envelope compatibility.
    #[serde(default)]
    pub model: Option<String>,
    /// Conversation messages; the last user message drives the turn.
    pub messages: Vec<ChatMessageDto>,
    /// Session to continue; omitted means a fresh session.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Structured parameter values, overriding anything extracted from text.
    #[serde(default)]
    pub provided_parameters: Option<ToolParams>,
    /// Skips tool selection and uses this tool directly.
    #[serde(default)]
    pub force_tool: Option<String>,
}

impl ChatCompletionRequest {
    /// Returns the content of the last user message, if any.
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
    }
}

/// A synthesized tool call in the response, present on execution.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallView {
    pub id: String,
    pub r#type: String,
    pub function: FunctionCallView,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionCallView {
    pub name: String,
    /// JSON-encoded argument object.
    pub arguments: String,
}

/// One choice in the response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ChoiceView {
    pub index: u32,
    pub message: AssistantMessageView,
    pub finish_reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistantMessageView {
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallView>>,
}

/// POST /v1/chat/completions response body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub model: String,
    pub session_id: String,
    pub choices: Vec<ChoiceView>,
    /// What the dispatcher decided this turn.
    pub tool_decision: TurnOutcome,
    /// The catalog in OpenAI tool format, for client-side display.
    pub tools: Vec<serde_json::Value>,
}

/// Error payload for all endpoint failures.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub r#type: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                message: message.into(),
                r#type: error_type.into(),
            },
        }
    }
}

/// GET /healthz response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub tools: usize,
}
