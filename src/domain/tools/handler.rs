//! Tool handler - the single execution capability a tool exposes.

use std::collections::BTreeMap;

use thiserror::Error;

/// Parameters passed to a tool handler.
///
/// Slot-filling collects values as strings; handlers parse what they need.
/// A `BTreeMap` keeps prompts and audit events deterministically ordered.
pub type ToolParams = BTreeMap<String, String>;

/// Errors raised by a tool's own execution.
///
/// These are *business* failures. The dispatcher does not absorb them:
/// a partially-run operation must surface to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HandlerError {
    #[error("missing parameter `{0}`")]
    MissingParameter(String),

    #[error("tool execution failed: {0}")]
    Failed(String),
}

/// Execution capability of a tool.
///
/// Implementations perform the business operation and return a structured
/// result payload. The builtin catalog uses stub handlers with canned
/// payloads; real integrations implement this trait at the same seam.
pub trait ToolHandler: Send + Sync {
    /// Runs the tool with the merged parameter mapping.
    fn execute(&self, params: &ToolParams) -> Result<serde_json::Value, HandlerError>;
}

/// Handler backed by a plain function, used by the builtin stubs.
pub struct FnHandler(pub fn(&ToolParams) -> Result<serde_json::Value, HandlerError>);

impl ToolHandler for FnHandler {
    fn execute(&self, params: &ToolParams) -> Result<serde_json::Value, HandlerError> {
        (self.0)(params)
    }
}
