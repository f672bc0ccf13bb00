//! LLM Client Port - the language-model collaborator behind tool selection
//! and result summarization.
//!
//! Unavailability is a typed `Err`, not an exception: every fallback the
//! dispatcher takes when the backend is missing or failing is a visible
//! branch on [`LlmUnavailable`].

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::session::ChatMessage;
use crate::domain::tools::{ToolCatalog, ToolParams};

/// A structured tool-call proposal from the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmToolCall {
    /// Proposed tool name (not yet validated against the catalog).
    pub name: String,
    /// Proposed argument mapping; empty when the model supplied none or
    /// supplied something that is not a JSON object.
    pub arguments: ToolParams,
}

/// One model turn: free text plus an optional tool-call proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmReply {
    /// Assistant free text (may be empty when a tool call is proposed).
    pub content: String,
    /// First tool-call proposal, if the model made one.
    pub tool_call: Option<LlmToolCall>,
}

/// The collaborator cannot serve this call.
///
/// Never surfaced to the end user; the dispatcher recovers locally.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LlmUnavailable {
    #[error("missing API credentials")]
    MissingCredentials,

    #[error("llm backend error: {0}")]
    Backend(String),
}

/// Port for the LLM backend.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends the conversation with the catalog exposed as invokable
    /// functions and returns the model's reply.
    async fn propose(
        &self,
        history: &[ChatMessage],
        catalog: &ToolCatalog,
    ) -> Result<LlmReply, LlmUnavailable>;

    /// Asks the model to phrase a tool's structured result for the user.
    async fn summarize_execution(
        &self,
        history: &[ChatMessage],
        tool_name: &str,
        result: &serde_json::Value,
    ) -> Result<String, LlmUnavailable>;
}
