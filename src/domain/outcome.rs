//! Per-turn outcome consumed by the transports.

use serde::{Deserialize, Serialize};

use super::tools::ToolParams;

/// What a single `process_message` turn produced.
///
/// Serializes with an `action` tag so transports can switch on it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// No tool could be resolved, or the resolved tool is unavailable.
    NoTool { assistant_message: String },

    /// A tool is chosen but required parameters are missing.
    NeedParameters {
        assistant_message: String,
        tool_name: String,
        /// Still-missing required parameter names, in the tool's declared order.
        missing_parameters: Vec<String>,
        collected_parameters: ToolParams,
        confidence: f64,
    },

    /// A fully-parameterized tool is below the confidence threshold and
    /// needs explicit user approval.
    NeedApproval {
        assistant_message: String,
        tool_name: String,
        collected_parameters: ToolParams,
        confidence: f64,
    },

    /// The tool ran.
    Executed {
        assistant_message: String,
        tool_name: String,
        tool_parameters: ToolParams,
        tool_result: serde_json::Value,
        confidence: f64,
    },

    /// Free-text reply, no tool involved.
    None { assistant_message: String },
}

impl TurnOutcome {
    /// Returns the user-facing assistant message for this turn.
    pub fn assistant_message(&self) -> &str {
        match self {
            TurnOutcome::NoTool { assistant_message }
            | TurnOutcome::NeedParameters { assistant_message, .. }
            | TurnOutcome::NeedApproval { assistant_message, .. }
            | TurnOutcome::Executed { assistant_message, .. }
            | TurnOutcome::None { assistant_message } => assistant_message,
        }
    }

    /// Returns the tool name involved in this turn, if any.
    pub fn tool_name(&self) -> Option<&str> {
        match self {
            TurnOutcome::NeedParameters { tool_name, .. }
            | TurnOutcome::NeedApproval { tool_name, .. }
            | TurnOutcome::Executed { tool_name, .. } => Some(tool_name),
            _ => None,
        }
    }

    /// Returns the confidence attached to this turn, if any.
    pub fn confidence(&self) -> Option<f64> {
        match self {
            TurnOutcome::NeedParameters { confidence, .. }
            | TurnOutcome::NeedApproval { confidence, .. }
            | TurnOutcome::Executed { confidence, .. } => Some(*confidence),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_action_tag() {
        let outcome = TurnOutcome::NoTool {
            assistant_message: "I couldn't determine the right tool.".to_string(),
        };

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["action"], "no_tool");
        assert!(json["assistant_message"].as_str().unwrap().contains("tool"));
    }

    #[test]
    fn executed_carries_result_and_parameters() {
        let mut params = ToolParams::new();
        params.insert("patient_id".to_string(), "pat_1".to_string());

        let outcome = TurnOutcome::Executed {
            assistant_message: "Done.".to_string(),
            tool_name: "lab_results_get".to_string(),
            tool_parameters: params,
            tool_result: serde_json::json!({"status": "ok"}),
            confidence: 0.92,
        };

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["action"], "executed");
        assert_eq!(json["tool_name"], "lab_results_get");
        assert_eq!(json["tool_parameters"]["patient_id"], "pat_1");
        assert_eq!(json["tool_result"]["status"], "ok");
    }

    #[test]
    fn accessors_cover_every_variant() {
        let none = TurnOutcome::None {
            assistant_message: "How can I help?".to_string(),
        };
        assert_eq!(none.assistant_message(), "How can I help?");
        assert_eq!(none.tool_name(), None);
        assert_eq!(none.confidence(), None);

        let approval = TurnOutcome::NeedApproval {
            assistant_message: "Proceed?".to_string(),
            tool_name: "appointment_cancel".to_string(),
            collected_parameters: ToolParams::new(),
            confidence: 0.3,
        };
        assert_eq!(approval.tool_name(), Some("appointment_cancel"));
        assert_eq!(approval.confidence(), Some(0.3));
    }
}
