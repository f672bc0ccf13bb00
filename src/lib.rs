//! Care Concierge - a conversational dispatcher for care workflow tools.
//!
//! Free-text messages are routed to validated, parameterized tool calls
//! against a fixed catalog. Selection is gated by a confidence score;
//! low-confidence calls pause for explicit user approval before anything
//! runs.
//!
//! Layout follows hexagonal architecture: `domain` holds the dialogue
//! state machine and tool catalog, `ports` the outward-facing contracts,
//! `adapters` their concrete bindings, and `config` the environment-driven
//! settings.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
