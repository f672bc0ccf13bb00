//! HTTP handlers for the chat and health endpoints.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::domain::orchestrator::{DispatchError, Dispatcher};
use crate::domain::outcome::TurnOutcome;
use crate::ports::SessionStore;

use super::dto::{
    AssistantMessageView, ChatCompletionRequest, ChatCompletionResponse, ChoiceView,
    ErrorResponse, FunctionCallView, HealthResponse, ToolCallView,
};

/// Shared application state for the chat handlers.
#[derive(Clone)]
pub struct ConciergeAppState {
    pub dispatcher: Arc<Dispatcher>,
    pub sessions: Arc<dyn SessionStore>,
}

impl ConciergeAppState {
    /// Creates a new ConciergeAppState.
    pub fn new(dispatcher: Arc<Dispatcher>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            dispatcher,
            sessions,
        }
    }
}

/// API-level errors with their HTTP mapping.
#[derive(Debug)]
pub enum ConciergeApiError {
    /// Malformed or empty request.
    BadRequest(String),
    /// The tool itself failed mid-execution.
    ToolFailed(String),
}

impl IntoResponse for ConciergeApiError {
    fn into_response(self) -> Response {
        let (status, message, error_type) = match self {
            ConciergeApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, message, "invalid_request_error")
            }
            ConciergeApiError::ToolFailed(message) => {
                (StatusCode::BAD_GATEWAY, message, "tool_execution_error")
            }
        };
        (status, Json(ErrorResponse::new(message, error_type))).into_response()
    }
}

impl From<DispatchError> for ConciergeApiError {
    fn from(err: DispatchError) -> Self {
        ConciergeApiError::ToolFailed(err.to_string())
    }
}

/// GET /healthz - liveness plus catalog size.
pub async fn health(State(state): State<ConciergeAppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        tools: state.dispatcher.catalog().len(),
    })
}

/// POST /v1/chat/completions - one dialogue turn.
///
/// The last user message in the body drives the turn; the session
/// continues under `session_id` or starts fresh without one.
///
/// # Errors
/// - 400 Bad Request: no user message in the body
/// - 502 Bad Gateway: the selected tool failed during execution
pub async fn chat_completions(
    State(state): State<ConciergeAppState>,
    Json(request): Json<ChatCompletionRequest>,
) -> Result<impl IntoResponse, ConciergeApiError> {
    let message = request
        .last_user_message()
        .ok_or_else(|| {
            ConciergeApiError::BadRequest("request contains no user message".to_string())
        })?
        .to_string();

    let mut session = state
        .sessions
        .get_or_create(request.session_id.as_deref())
        .await;

    let outcome = state
        .dispatcher
        .process_message(
            &mut session,
            &message,
            request.provided_parameters.clone(),
            request.force_tool.as_deref(),
        )
        .await?;

    let session_id = session.session_id.clone();
    state.sessions.upsert(session).await;

    let tools = state.dispatcher.catalog().to_openai_tools();
    Ok((StatusCode::OK, Json(envelope(session_id, outcome, tools))))
}

/// Wraps a turn outcome into the chat-completion envelope.
fn envelope(
    session_id: String,
    outcome: TurnOutcome,
    tools: Vec<serde_json::Value>,
) -> ChatCompletionResponse {
    let created = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    let (tool_calls, finish_reason) = match &outcome {
        TurnOutcome::Executed {
            tool_name,
            tool_parameters,
            ..
        } => {
            let arguments =
                serde_json::to_string(tool_parameters).unwrap_or_else(|_| "{}".to_string());
            let call = ToolCallView {
                id: format!("call_{}", Uuid::new_v4().simple()),
                r#type: "function".to_string(),
                function: FunctionCallView {
                    name: tool_name.clone(),
                    arguments,
                },
            };
            (Some(vec![call]), "tool_calls")
        }
        _ => (None, "stop"),
    };

    ChatCompletionResponse {
        id: format!("chatcmpl-{}", Uuid::new_v4().simple()),
        object: "chat.completion".to_string(),
        created,
        model: "care-concierge".to_string(),
        session_id,
        choices: vec![ChoiceView {
            index: 0,
            message: AssistantMessageView {
                role: "assistant".to_string(),
                content: outcome.assistant_message().to_string(),
                tool_calls,
            },
            finish_reason: finish_reason.to_string(),
        }],
        tool_decision: outcome,
        tools,
    }
}
