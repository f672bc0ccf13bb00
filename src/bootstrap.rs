//! Process wiring shared by the server and the REPL.

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::adapters::llm::{OpenAiClient, OpenAiConfig};
use crate::adapters::scoring::{RemoteConfidenceModel, RemoteScorerConfig};
use crate::config::{AppConfig, ScoringBackend};
use crate::domain::confidence::{ConfidenceModel, KeywordConfidenceModel};
use crate::domain::orchestrator::Dispatcher;
use crate::domain::tools::builtin_catalog;
use crate::ports::LlmClient;

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins over the configured default filter.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Builds the dispatcher from configuration: catalog, scorer, and the
/// optional LLM collaborator.
pub fn build_dispatcher(config: &AppConfig) -> Dispatcher {
    let catalog = Arc::new(builtin_catalog());

    let local: Arc<dyn ConfidenceModel> = Arc::new(KeywordConfidenceModel::new(
        config.agent.softmax_temperature,
    ));

    let confidence: Arc<dyn ConfidenceModel> = match (&config.agent.scoring, &config.agent.remote_scorer_url) {
        (ScoringBackend::Remote, Some(url)) => {
            let scorer_config = RemoteScorerConfig::new(url.clone())
                .with_timeout(config.agent.remote_scorer_timeout());
            match RemoteConfidenceModel::new(scorer_config, local.clone()) {
                Ok(remote) => {
                    info!(url = %url, "scoring_backend_remote");
                    Arc::new(remote)
                }
                Err(err) => {
                    warn!(error = %err, "remote scorer unavailable, using local scoring");
                    local
                }
            }
        }
        _ => local,
    };

    let llm = build_llm(config);

    Dispatcher::new(catalog, confidence, llm, config.agent.approval_threshold)
}

/// Builds the LLM collaborator, or `None` when it is disabled or has no
/// credentials.
fn build_llm(config: &AppConfig) -> Option<Arc<dyn LlmClient>> {
    if !config.agent.use_llm {
        return None;
    }
    let Some(api_key) = config.llm.api_key() else {
        warn!("llm assistance enabled but no API key configured, running without it");
        return None;
    };

    let mut openai_config = OpenAiConfig::new(api_key)
        .with_model(config.llm.model.clone())
        .with_base_url(config.llm.base_url.clone())
        .with_timeout(config.llm.timeout());
    if let Some(prompt) = &config.llm.system_prompt {
        openai_config = openai_config.with_system_prompt(prompt.clone());
    }

    match OpenAiClient::new(openai_config) {
        Ok(client) => {
            info!(model = %config.llm.model, "llm_collaborator_enabled");
            Some(Arc::new(client))
        }
        Err(err) => {
            warn!(error = %err, "llm client unavailable, running without it");
            None
        }
    }
}
