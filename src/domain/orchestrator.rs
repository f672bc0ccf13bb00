//! Dialogue orchestrator - the per-turn dispatch state machine.
//!
//! Each call to [`Dispatcher::process_message`] advances one session by one
//! turn: classify an approval answer, continue slot-filling, or select a
//! tool (lexically, by force, or through the LLM collaborator), then either
//! execute or pause behind the approval gate.
//!
//! Collaborator failures (missing credentials, unreachable backends) are
//! recovered locally and never reach the user. Tool handler failures are
//! not absorbed: a partially-run business operation propagates as
//! [`DispatchError::Handler`].

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::ports::{LlmClient, LlmUnavailable};

use super::confidence::ConfidenceModel;
use super::extract::extract_parameters;
use super::outcome::TurnOutcome;
use super::session::{DialogueState, PendingToolCall, SessionState};
use super::tools::{HandlerError, ToolCatalog, ToolDescriptor, ToolParams};

/// Phrases accepted as approval. Matches on the normalized message, exact
/// or substring.
const APPROVAL_YES: &[&str] = &[
    "yes", "y", "approve", "approved", "go ahead", "ok", "okay", "do it",
];

/// Phrases accepted as decline.
const APPROVAL_NO: &[&str] = &["no", "n", "decline", "deny", "stop", "cancel"];

/// Blended confidence floor when the LLM proposed a call with arguments.
const LLM_CONFIDENCE_WITH_ARGS: f64 = 0.85;

/// Blended confidence floor when the LLM proposed a call without arguments.
const LLM_CONFIDENCE_WITHOUT_ARGS: f64 = 0.75;

/// Hard per-turn failures. Everything else degrades to a user-visible
/// outcome instead.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The tool's own execution failed. The pending call is cleared before
    /// this propagates, so a retried "yes" cannot re-run the operation.
    #[error("tool `{tool}` failed: {source}")]
    Handler {
        tool: String,
        #[source]
        source: HandlerError,
    },
}

/// The dialogue/tool-dispatch engine.
///
/// Holds no per-session state; sessions come and go through the
/// `SessionStore` port at the transport layer.
pub struct Dispatcher {
    catalog: Arc<ToolCatalog>,
    confidence: Arc<dyn ConfidenceModel>,
    /// Present only when LLM assistance is enabled *and* credentials were
    /// available at wiring time.
    llm: Option<Arc<dyn LlmClient>>,
    approval_threshold: f64,
}

impl Dispatcher {
    /// Creates a dispatcher.
    ///
    /// `approval_threshold` is clamped to [0, 1]; a fully-parameterized
    /// tool below it pauses for user approval.
    pub fn new(
        catalog: Arc<ToolCatalog>,
        confidence: Arc<dyn ConfidenceModel>,
        llm: Option<Arc<dyn LlmClient>>,
        approval_threshold: f64,
    ) -> Self {
        Self {
            catalog,
            confidence,
            llm,
            approval_threshold: approval_threshold.clamp(0.0, 1.0),
        }
    }

    /// Returns the tool catalog.
    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Advances `session` by one turn.
    pub async fn process_message(
        &self,
        session: &mut SessionState,
        message: &str,
        provided_parameters: Option<ToolParams>,
        force_tool: Option<&str>,
    ) -> Result<TurnOutcome, DispatchError> {
        let provided = provided_parameters.unwrap_or_default();
        session.push_user(message);
        info!(
            session_id = %session.session_id,
            message,
            "user_message"
        );

        match session.dialogue.clone() {
            DialogueState::AwaitingApproval {
                tool_name,
                parameters,
                confidence,
            } => {
                self.handle_approval(session, message, tool_name, parameters, confidence)
                    .await
            }
            DialogueState::Collecting { call } => {
                self.collect_parameters(session, message, call, provided).await
            }
            DialogueState::Idle => {
                if let (Some(llm), None) = (self.llm.clone(), force_tool) {
                    self.process_with_llm(session, message, provided, llm).await
                } else {
                    let (tool_name, confidence) = match force_tool {
                        Some(name) => {
                            info!(
                                session_id = %session.session_id,
                                tool = name,
                                confidence = 1.0,
                                forced = true,
                                "tool_selection"
                            );
                            (Some(name.to_string()), 1.0)
                        }
                        None => {
                            let report = self.confidence.score(message, &self.catalog).await;
                            info!(
                                session_id = %session.session_id,
                                tool = report.tool_name.as_deref().unwrap_or("-"),
                                confidence = report.confidence,
                                scores = ?report.scores,
                                "tool_selection"
                            );
                            (report.tool_name, report.confidence)
                        }
                    };
                    self.start_collection(
                        session,
                        message,
                        tool_name,
                        confidence,
                        ToolParams::new(),
                        provided,
                    )
                    .await
                }
            }
        }
    }

    /// S2: classify the message as yes / no / ambiguous.
    async fn handle_approval(
        &self,
        session: &mut SessionState,
        message: &str,
        tool_name: String,
        parameters: ToolParams,
        confidence: f64,
    ) -> Result<TurnOutcome, DispatchError> {
        match classify_approval(message) {
            Some(true) => {
                info!(
                    session_id = %session.session_id,
                    tool = %tool_name,
                    approved = true,
                    "approval_received"
                );
                self.execute(session, &tool_name, parameters, confidence).await
            }
            Some(false) => {
                session.dialogue = DialogueState::Idle;
                info!(
                    session_id = %session.session_id,
                    approved = false,
                    "approval_received"
                );
                Ok(self.finish(
                    session,
                    TurnOutcome::NoTool {
                        assistant_message:
                            "Understood. I won't run that tool. What would you like to do next?"
                                .to_string(),
                    },
                ))
            }
            None => {
                // Ambiguous: stay in S2 and re-prompt, nothing else changes.
                Ok(self.finish(
                    session,
                    TurnOutcome::NeedApproval {
                        assistant_message:
                            "Please confirm: should I proceed with the tool call? (yes/no)"
                                .to_string(),
                        tool_name,
                        collected_parameters: parameters,
                        confidence,
                    },
                ))
            }
        }
    }

    /// S1: merge newly extracted and caller-provided values into the
    /// pending call.
    async fn collect_parameters(
        &self,
        session: &mut SessionState,
        message: &str,
        call: PendingToolCall,
        provided: ToolParams,
    ) -> Result<TurnOutcome, DispatchError> {
        let Some(tool) = self.catalog.get(&call.tool_name) else {
            // Pending names are validated at creation; a stale name means
            // the catalog changed under us. Start over.
            session.dialogue = DialogueState::Idle;
            return Ok(self.finish(
                session,
                TurnOutcome::NoTool {
                    assistant_message: "That tool isn't available. Please try a different request."
                        .to_string(),
                },
            ));
        };
        let tool = tool.clone();

        let extracted = extract_parameters(message);
        info!(
            session_id = %session.session_id,
            source = "pending_tool",
            extracted = ?extracted,
            "extracted_parameters"
        );

        // Precedence: previous pending < freshly extracted < caller provided.
        let mut merged = call.parameters;
        merged.extend(extracted);
        merged.extend(provided);

        let missing = missing_parameters(tool.required(), &merged);
        info!(
            session_id = %session.session_id,
            tool = tool.name(),
            missing = ?missing,
            collected = ?merged,
            "collect_parameters"
        );

        if !missing.is_empty() {
            session.dialogue = DialogueState::Collecting {
                call: PendingToolCall {
                    tool_name: tool.name().to_string(),
                    parameters: merged.clone(),
                    missing: missing.clone(),
                    confidence: call.confidence,
                },
            };
            return Ok(self.finish(
                session,
                TurnOutcome::NeedParameters {
                    assistant_message: missing_prompt(tool.name(), &missing),
                    tool_name: tool.name().to_string(),
                    missing_parameters: missing,
                    collected_parameters: merged,
                    confidence: call.confidence,
                },
            ));
        }

        // Confidence captured at selection time gates the execution.
        self.decide_or_execute(session, &tool, merged, call.confidence).await
    }

    /// S0 with LLM assistance: ask the model for a tool-call proposal.
    async fn process_with_llm(
        &self,
        session: &mut SessionState,
        message: &str,
        provided: ToolParams,
        llm: Arc<dyn LlmClient>,
    ) -> Result<TurnOutcome, DispatchError> {
        let reply = match llm.propose(&session.messages, &self.catalog).await {
            Ok(reply) => reply,
            Err(err) => {
                // Collaborator down: recover with the lexical selector.
                warn!(
                    session_id = %session.session_id,
                    error = %err,
                    "llm_fallback"
                );
                let report = self.confidence.score(message, &self.catalog).await;
                info!(
                    session_id = %session.session_id,
                    tool = report.tool_name.as_deref().unwrap_or("-"),
                    confidence = report.confidence,
                    scores = ?report.scores,
                    source = "fallback",
                    "tool_selection"
                );
                return self
                    .start_collection(
                        session,
                        message,
                        report.tool_name,
                        report.confidence,
                        ToolParams::new(),
                        provided,
                    )
                    .await;
            }
        };

        info!(
            session_id = %session.session_id,
            content = %reply.content,
            tool_call = ?reply.tool_call,
            "llm_response"
        );

        let Some(tool_call) = reply.tool_call else {
            // Free-text answer: no tool, no state change.
            let assistant_message = if reply.content.is_empty() {
                "How can I help you today?".to_string()
            } else {
                reply.content
            };
            return Ok(self.finish(session, TurnOutcome::None { assistant_message }));
        };

        // Score lexically anyway, for auditability and blending.
        let report = self.confidence.score(message, &self.catalog).await;
        let llm_floor = if tool_call.arguments.is_empty() {
            LLM_CONFIDENCE_WITHOUT_ARGS
        } else {
            LLM_CONFIDENCE_WITH_ARGS
        };
        let confidence = report.confidence.max(llm_floor);
        info!(
            session_id = %session.session_id,
            tool = %tool_call.name,
            confidence,
            selector_confidence = report.confidence,
            scores = ?report.scores,
            llm_args = ?tool_call.arguments,
            source = "llm",
            "tool_selection"
        );

        self.start_collection(
            session,
            message,
            Some(tool_call.name),
            confidence,
            tool_call.arguments,
            provided,
        )
        .await
    }

    /// S0 tail shared by the forced, lexical, and LLM paths: resolve the
    /// tool, extract parameters, create the pending call.
    async fn start_collection(
        &self,
        session: &mut SessionState,
        message: &str,
        tool_name: Option<String>,
        confidence: f64,
        llm_args: ToolParams,
        provided: ToolParams,
    ) -> Result<TurnOutcome, DispatchError> {
        let Some(tool_name) = tool_name else {
            return Ok(self.finish(
                session,
                TurnOutcome::NoTool {
                    assistant_message:
                        "I couldn't determine the right tool. Can you rephrase or be more specific?"
                            .to_string(),
                },
            ));
        };

        let Some(tool) = self.catalog.get(&tool_name) else {
            return Ok(self.finish(
                session,
                TurnOutcome::NoTool {
                    assistant_message: "That tool isn't available. Please try a different request."
                        .to_string(),
                },
            ));
        };
        let tool = tool.clone();

        let extracted = extract_parameters(message);
        info!(
            session_id = %session.session_id,
            source = "initial",
            extracted = ?extracted,
            "extracted_parameters"
        );

        // Precedence: llm args < extracted < caller provided.
        let mut merged = llm_args;
        merged.extend(extracted);
        merged.extend(provided);

        let missing = missing_parameters(tool.required(), &merged);

        if !missing.is_empty() {
            info!(
                session_id = %session.session_id,
                tool = tool.name(),
                missing = ?missing,
                collected = ?merged,
                "tool_missing_parameters"
            );
            session.dialogue = DialogueState::Collecting {
                call: PendingToolCall {
                    tool_name: tool.name().to_string(),
                    parameters: merged.clone(),
                    missing: missing.clone(),
                    confidence,
                },
            };
            return Ok(self.finish(
                session,
                TurnOutcome::NeedParameters {
                    assistant_message: missing_prompt(tool.name(), &missing),
                    tool_name: tool.name().to_string(),
                    missing_parameters: missing,
                    collected_parameters: merged,
                    confidence,
                },
            ));
        }

        self.decide_or_execute(session, &tool, merged, confidence).await
    }

    /// Confidence gate: below threshold pauses for approval, otherwise the
    /// tool runs in the same turn.
    async fn decide_or_execute(
        &self,
        session: &mut SessionState,
        tool: &ToolDescriptor,
        parameters: ToolParams,
        confidence: f64,
    ) -> Result<TurnOutcome, DispatchError> {
        if confidence < self.approval_threshold {
            session.dialogue = DialogueState::AwaitingApproval {
                tool_name: tool.name().to_string(),
                parameters: parameters.clone(),
                confidence,
            };
            info!(
                session_id = %session.session_id,
                tool = tool.name(),
                confidence,
                threshold = self.approval_threshold,
                "approval_required"
            );
            return Ok(self.finish(
                session,
                TurnOutcome::NeedApproval {
                    assistant_message: format!(
                        "I think we should call `{}`, but my confidence is {:.2}. \
                         Do you want me to proceed? (yes/no)",
                        tool.name(),
                        confidence
                    ),
                    tool_name: tool.name().to_string(),
                    collected_parameters: parameters,
                    confidence,
                },
            ));
        }

        self.execute(session, tool.name(), parameters, confidence).await
    }

    /// Runs the tool handler and reports the result.
    async fn execute(
        &self,
        session: &mut SessionState,
        tool_name: &str,
        parameters: ToolParams,
        confidence: f64,
    ) -> Result<TurnOutcome, DispatchError> {
        let Some(tool) = self.catalog.get(tool_name) else {
            session.dialogue = DialogueState::Idle;
            return Ok(self.finish(
                session,
                TurnOutcome::NoTool {
                    assistant_message: "That tool isn't available.".to_string(),
                },
            ));
        };
        let tool = tool.clone();

        // Clear the pending call before running: whether the handler
        // succeeds or fails, this call must not be re-runnable.
        session.dialogue = DialogueState::Idle;

        let result = tool
            .handler()
            .execute(&parameters)
            .map_err(|source| DispatchError::Handler {
                tool: tool.name().to_string(),
                source,
            })?;

        info!(
            session_id = %session.session_id,
            tool = tool.name(),
            parameters = ?parameters,
            result = %result,
            "tool_executed"
        );

        let assistant_message = self
            .summarize(session, tool.name(), &result)
            .await
            .unwrap_or_else(|| format!("Tool `{}` executed successfully.", tool.name()));

        Ok(self.finish(
            session,
            TurnOutcome::Executed {
                assistant_message,
                tool_name: tool.name().to_string(),
                tool_parameters: parameters,
                tool_result: result,
                confidence,
            },
        ))
    }

    /// Optional natural-language summary of a result. `None` means: use the
    /// templated confirmation instead.
    async fn summarize(
        &self,
        session: &SessionState,
        tool_name: &str,
        result: &serde_json::Value,
    ) -> Option<String> {
        let llm = self.llm.as_ref()?;
        match llm
            .summarize_execution(&session.messages, tool_name, result)
            .await
        {
            Ok(content) if !content.is_empty() => Some(content),
            Ok(_) => None,
            Err(LlmUnavailable::MissingCredentials) => None,
            Err(err) => {
                warn!(error = %err, "summary_fallback");
                None
            }
        }
    }

    /// Appends the assistant message to the history and hands the outcome
    /// back.
    fn finish(&self, session: &mut SessionState, outcome: TurnOutcome) -> TurnOutcome {
        session.push_assistant(outcome.assistant_message());
        outcome
    }
}

/// Classifies an approval answer. `None` means ambiguous.
fn classify_approval(message: &str) -> Option<bool> {
    let text = message.to_lowercase();
    let text = text.trim();
    if APPROVAL_YES.iter().any(|t| *t == text || text.contains(t)) {
        return Some(true);
    }
    if APPROVAL_NO.iter().any(|t| *t == text || text.contains(t)) {
        return Some(false);
    }
    None
}

/// Required names with no usable value: absent or empty string.
fn missing_parameters(required: &[String], provided: &ToolParams) -> Vec<String> {
    required
        .iter()
        .filter(|name| provided.get(*name).map_or(true, |v| v.is_empty()))
        .cloned()
        .collect()
}

fn missing_prompt(tool_name: &str, missing: &[String]) -> String {
    format!(
        "To run `{}`, I still need: {}. Please provide them as `param: value`.",
        tool_name,
        missing.join(", ")
    )
}
