//! Per-conversation session state.
//!
//! The dialogue position is a tagged variant rather than an option-plus-flag
//! pair: "awaiting approval while parameters are still missing" is not a
//! value this type can hold.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tools::ToolParams;

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One exchanged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// An in-progress tool selection whose required parameters are still being
/// collected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingToolCall {
    /// Name of the selected tool; must resolve in the catalog.
    pub tool_name: String,
    /// Parameter values collected so far.
    pub parameters: ToolParams,
    /// Required parameter names still unresolved.
    pub missing: Vec<String>,
    /// Confidence captured when the tool was selected.
    pub confidence: f64,
}

/// Dialogue position, derived turn by turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DialogueState {
    /// No tool in flight.
    Idle,
    /// A tool is selected and required parameters are still missing.
    Collecting { call: PendingToolCall },
    /// A fully-parameterized tool is waiting for user approval.
    AwaitingApproval {
        tool_name: String,
        parameters: ToolParams,
        confidence: f64,
    },
}

impl DialogueState {
    /// Returns true when no tool is in flight.
    pub fn is_idle(&self) -> bool {
        matches!(self, DialogueState::Idle)
    }

    /// Returns true when waiting on user approval.
    pub fn is_awaiting_approval(&self) -> bool {
        matches!(self, DialogueState::AwaitingApproval { .. })
    }
}

/// Full per-session record: identity, history, and dialogue position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: String,
    /// Append-only message history.
    pub messages: Vec<ChatMessage>,
    pub dialogue: DialogueState,
}

impl SessionState {
    /// Creates a fresh session with the given id.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            messages: Vec::new(),
            dialogue: DialogueState::Idle,
        }
    }

    /// Creates a fresh session with a generated id.
    pub fn with_generated_id() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Appends a user message to the history.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    /// Appends an assistant message to the history.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }
}
