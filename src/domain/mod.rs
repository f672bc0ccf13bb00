//! Domain - the dialogue/tool-dispatch core.

pub mod confidence;
pub mod extract;
pub mod orchestrator;
pub mod outcome;
pub mod session;
pub mod tools;
