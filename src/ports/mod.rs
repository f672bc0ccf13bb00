//! Ports - trait seams between the dialogue core and its collaborators.

mod llm_client;
mod session_store;

pub use llm_client::{LlmClient, LlmReply, LlmToolCall, LlmUnavailable};
pub use session_store::SessionStore;
