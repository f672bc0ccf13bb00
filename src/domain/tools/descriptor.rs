//! Tool descriptor - schema and metadata for a dispatchable tool.
//!
//! A descriptor carries everything the dispatcher needs to select a tool
//! (keywords), fill its slots (required parameter names), present it to an
//! LLM backend (JSON schema), and run it (handler).

use std::sync::Arc;

use super::handler::ToolHandler;

/// Immutable descriptor for one tool in the catalog.
///
/// # Examples
///
/// ```ignore
/// use care_concierge::domain::tools::{ToolDescriptor, FnHandler};
///
/// let descriptor = ToolDescriptor::new(
///     "appointment_cancel",
///     "Cancel an existing appointment.",
///     serde_json::json!({
///         "type": "object",
///         "properties": {
///             "appointment_id": { "type": "string", "description": "Appointment identifier." }
///         },
///         "required": ["appointment_id"]
///     }),
///     ["appointment_id"],
///     ["cancel appointment", "cancel visit", "cancel"],
///     FnHandler(|_| Ok(serde_json::json!({"status": "cancelled"}))),
/// );
/// ```
#[derive(Clone)]
pub struct ToolDescriptor {
    /// Unique name, the catalog key (e.g. "appointment_book").
    name: String,

    /// Human-readable description for the LLM backend and docs.
    description: String,

    /// JSON Schema for the parameters.
    parameters_schema: serde_json::Value,

    /// Required parameter names; slot-filling runs until all are present.
    required: Vec<String>,

    /// Keywords the lexical confidence model matches against.
    keywords: Vec<String>,

    /// Execution capability.
    handler: Arc<dyn ToolHandler>,
}

impl ToolDescriptor {
    /// Creates a new tool descriptor.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters_schema: serde_json::Value,
        required: impl IntoIterator<Item = impl Into<String>>,
        keywords: impl IntoIterator<Item = impl Into<String>>,
        handler: impl ToolHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters_schema,
            required: required.into_iter().map(Into::into).collect(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            handler: Arc::new(handler),
        }
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameters schema.
    pub fn parameters_schema(&self) -> &serde_json::Value {
        &self.parameters_schema
    }

    /// Returns the required parameter names.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Returns the matching keywords.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Returns the execution handler.
    pub fn handler(&self) -> &dyn ToolHandler {
        self.handler.as_ref()
    }

    /// Converts to OpenAI function-calling format.
    pub fn to_openai_format(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters_schema
            }
        })
    }
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("keywords", &self.keywords)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tools::handler::FnHandler;

    fn sample_descriptor() -> ToolDescriptor {
        ToolDescriptor::new(
            "appointment_cancel",
            "Cancel an existing appointment.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "appointment_id": { "type": "string" }
                },
                "required": ["appointment_id"]
            }),
            ["appointment_id"],
            ["cancel appointment", "cancel visit", "cancel"],
            FnHandler(|_| Ok(serde_json::json!({"status": "cancelled"}))),
        )
    }

    #[test]
    fn new_creates_descriptor() {
        let descriptor = sample_descriptor();

        assert_eq!(descriptor.name(), "appointment_cancel");
        assert_eq!(descriptor.required(), &["appointment_id".to_string()]);
        assert_eq!(descriptor.keywords().len(), 3);
    }

    #[test]
    fn to_openai_format_has_correct_structure() {
        let openai = sample_descriptor().to_openai_format();

        assert_eq!(openai["type"], "function");
        assert_eq!(openai["function"]["name"], "appointment_cancel");
        assert!(openai["function"]["parameters"].is_object());
    }

    #[test]
    fn handler_is_invocable_through_descriptor() {
        let descriptor = sample_descriptor();
        let result = descriptor.handler().execute(&Default::default()).unwrap();
        assert_eq!(result["status"], "cancelled");
    }
}
