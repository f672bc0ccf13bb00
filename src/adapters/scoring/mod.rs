//! Confidence scoring adapters.

pub mod remote;

pub use remote::{RemoteConfidenceModel, RemoteScorerConfig};
