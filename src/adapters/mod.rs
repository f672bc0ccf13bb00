//! Adapters - concrete implementations of the ports.
//!
//! Each submodule binds one port to an external technology: the OpenAI
//! API, an HTTP surface, a remote scoring service, or in-process storage.

pub mod http;
pub mod llm;
pub mod scoring;
pub mod store;
