//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `CONCIERGE_` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use care_concierge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod agent;
mod error;
mod llm;
mod server;

pub use agent::{AgentConfig, ScoringBackend};
pub use error::{ConfigError, ValidationError};
pub use llm::LlmConfig;
pub use server::ServerConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, timeouts)
    #[serde(default)]
    pub server: ServerConfig,

    /// Agent configuration (scoring, approval gate)
    #[serde(default)]
    pub agent: AgentConfig,

    /// LLM collaborator configuration
    #[serde(default)]
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CONCIERGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CONCIERGE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CONCIERGE__AGENT__APPROVAL_THRESHOLD=0.8` -> `agent.approval_threshold = 0.8`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CONCIERGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.agent.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.agent.use_llm);
        assert!(config.llm.api_key().is_none());
    }
}
