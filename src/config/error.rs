//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Approval threshold must be a finite number")]
    InvalidApprovalThreshold,

    #[error("Softmax temperature must be a positive finite number")]
    InvalidTemperature,

    #[error("Remote scoring selected but no scorer URL configured")]
    MissingRemoteScorerUrl,
}
