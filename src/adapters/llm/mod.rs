//! LLM client adapters.

pub mod mock;
pub mod openai;

pub use mock::MockLlmClient;
pub use openai::{OpenAiClient, OpenAiConfig};
