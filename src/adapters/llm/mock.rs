//! Mock LLM client for testing.
//!
//! Configurable implementation of the LlmClient port so dialogue flows can
//! be exercised without a real backend.
//!
//! # Features
//!
//! - Pre-configured replies, consumed in order
//! - Error injection for fallback testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let client = MockLlmClient::new()
//!     .with_tool_call("appointment_cancel", &[("appointment_id", "apt_1")]);
//!
//! let reply = client.propose(&history, &catalog).await?;
//! assert!(reply.tool_call.is_some());
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::session::ChatMessage;
use crate::domain::tools::{ToolCatalog, ToolParams};
use crate::ports::{LlmClient, LlmReply, LlmToolCall, LlmUnavailable};

/// A configured mock reply.
#[derive(Debug, Clone)]
enum MockReply {
    Success(LlmReply),
    Error(LlmUnavailable),
}

/// Mock LLM client.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    /// Pre-configured replies (consumed in order).
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    /// Pre-configured summaries (consumed in order).
    summaries: Arc<Mutex<VecDeque<Result<String, LlmUnavailable>>>>,
    /// Number of `propose` calls made.
    propose_calls: Arc<Mutex<usize>>,
    /// Number of `summarize_execution` calls made.
    summary_calls: Arc<Mutex<usize>>,
}

impl MockLlmClient {
    /// Creates a mock with no configured replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a free-text reply with no tool call.
    pub fn with_content(self, content: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Success(LlmReply {
                content: content.into(),
                tool_call: None,
            }));
        self
    }

    /// Queues a tool-call proposal.
    pub fn with_tool_call(self, name: impl Into<String>, arguments: &[(&str, &str)]) -> Self {
        let arguments: ToolParams = arguments
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Success(LlmReply {
                content: String::new(),
                tool_call: Some(LlmToolCall {
                    name: name.into(),
                    arguments,
                }),
            }));
        self
    }

    /// Queues an unavailability error.
    pub fn with_error(self, error: LlmUnavailable) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Error(error));
        self
    }

    /// Queues a summarization result.
    pub fn with_summary(self, summary: Result<String, LlmUnavailable>) -> Self {
        self.summaries.lock().unwrap().push_back(summary);
        self
    }

    /// Returns the number of `propose` calls made.
    pub fn propose_count(&self) -> usize {
        *self.propose_calls.lock().unwrap()
    }

    /// Returns the number of `summarize_execution` calls made.
    pub fn summary_count(&self) -> usize {
        *self.summary_calls.lock().unwrap()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn propose(
        &self,
        _history: &[ChatMessage],
        _catalog: &ToolCatalog,
    ) -> Result<LlmReply, LlmUnavailable> {
        *self.propose_calls.lock().unwrap() += 1;

        match self.replies.lock().unwrap().pop_front() {
            Some(MockReply::Success(reply)) => Ok(reply),
            Some(MockReply::Error(err)) => Err(err),
            None => Ok(LlmReply {
                content: "Mock reply".to_string(),
                tool_call: None,
            }),
        }
    }

    async fn summarize_execution(
        &self,
        _history: &[ChatMessage],
        tool_name: &str,
        _result: &serde_json::Value,
    ) -> Result<String, LlmUnavailable> {
        *self.summary_calls.lock().unwrap() += 1;

        match self.summaries.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(format!("The `{tool_name}` call completed.")),
        }
    }
}
