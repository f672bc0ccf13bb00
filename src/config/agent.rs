//! Agent configuration - dispatch, scoring, and the approval gate.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Which confidence scoring backend to use.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScoringBackend {
    /// Local keyword-density scorer.
    #[default]
    Keyword,
    /// External scoring service with local fallback.
    Remote,
}

/// Agent configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Whether the LLM collaborator drives tool selection.
    #[serde(default = "default_use_llm")]
    pub use_llm: bool,

    /// Confidence scoring backend.
    #[serde(default)]
    pub scoring: ScoringBackend,

    /// Softmax temperature for score normalization.
    #[serde(default = "default_temperature")]
    pub softmax_temperature: f64,

    /// Remote scoring endpoint, required when `scoring = remote`.
    pub remote_scorer_url: Option<String>,

    /// Remote scorer request timeout in seconds.
    #[serde(default = "default_scorer_timeout")]
    pub remote_scorer_timeout_secs: u64,

    /// Confidence below this pauses for user approval.
    #[serde(default = "default_approval_threshold")]
    pub approval_threshold: f64,
}

impl AgentConfig {
    /// Remote scorer timeout as a [`Duration`].
    pub fn remote_scorer_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_scorer_timeout_secs)
    }

    /// Validate agent configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.approval_threshold.is_finite() {
            return Err(ValidationError::InvalidApprovalThreshold);
        }
        if !self.softmax_temperature.is_finite() || self.softmax_temperature <= 0.0 {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.scoring == ScoringBackend::Remote && self.remote_scorer_url.is_none() {
            return Err(ValidationError::MissingRemoteScorerUrl);
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            use_llm: default_use_llm(),
            scoring: ScoringBackend::default(),
            softmax_temperature: default_temperature(),
            remote_scorer_url: None,
            remote_scorer_timeout_secs: default_scorer_timeout(),
            approval_threshold: default_approval_threshold(),
        }
    }
}

fn default_use_llm() -> bool {
    true
}

fn default_temperature() -> f64 {
    1.0
}

fn default_scorer_timeout() -> u64 {
    3
}

fn default_approval_threshold() -> f64 {
    0.6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_config_defaults() {
        let config = AgentConfig::default();
        assert!(config.use_llm);
        assert_eq!(config.scoring, ScoringBackend::Keyword);
        assert_eq!(config.softmax_temperature, 1.0);
        assert_eq!(config.approval_threshold, 0.6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_remote_scoring_requires_url() {
        let config = AgentConfig {
            scoring: ScoringBackend::Remote,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRemoteScorerUrl)
        ));

        let config = AgentConfig {
            scoring: ScoringBackend::Remote,
            remote_scorer_url: Some("http://scorer.internal/score".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_temperature_must_be_positive() {
        let config = AgentConfig {
            softmax_temperature: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AgentConfig {
            softmax_temperature: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
