//! Remote scoring service adapter.
//!
//! Posts the message and the catalog's tool metadata to an external
//! scoring endpoint. The scores the service returns are taken at face
//! value: the arg-max raw score becomes the confidence, with no local
//! re-normalization. Any transport or payload failure falls back to the
//! wrapped local model, so a scorer outage never changes the shape of a
//! turn.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::domain::confidence::{select_best, ConfidenceModel, ConfidenceReport};
use crate::domain::tools::ToolCatalog;

/// Configuration for the remote scorer.
#[derive(Debug, Clone)]
pub struct RemoteScorerConfig {
    /// Scoring endpoint URL.
    pub url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl RemoteScorerConfig {
    /// Creates a configuration for the given endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(3),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Confidence model backed by an external scoring service, with a local
/// fallback.
pub struct RemoteConfidenceModel {
    config: RemoteScorerConfig,
    client: Client,
    /// Used whenever the remote call fails in any way.
    fallback: Arc<dyn ConfidenceModel>,
}

impl RemoteConfidenceModel {
    /// Creates a remote model falling back to `fallback` on failure.
    pub fn new(
        config: RemoteScorerConfig,
        fallback: Arc<dyn ConfidenceModel>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            config,
            client,
            fallback,
        })
    }

    async fn fetch(
        &self,
        message: &str,
        catalog: &ToolCatalog,
    ) -> Result<ScoreResponse, String> {
        let request = ScoreRequest {
            message: message.to_string(),
            tools: catalog
                .iter()
                .map(|t| ToolSummary {
                    name: t.name().to_string(),
                    description: t.description().to_string(),
                    keywords: t.keywords().to_vec(),
                })
                .collect(),
        };

        let response = self
            .client
            .post(&self.config.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("scorer returned status {status}"));
        }

        response.json().await.map_err(|e| e.to_string())
    }

    /// Interprets a scorer response. `None` means the body was unusable
    /// and the fallback should decide.
    fn interpret(body: ScoreResponse, catalog: &ToolCatalog) -> Option<ConfidenceReport> {
        // Preferred form: a full score map. Scores for tools we do not
        // have are discarded; the arg-max raw score is the confidence.
        if let Some(scores) = body.scores {
            let filtered: BTreeMap<String, f64> = scores
                .into_iter()
                .filter(|(name, _)| catalog.contains(name))
                .collect();

            if !filtered.is_empty() {
                if filtered.values().all(|s| *s <= 0.0) {
                    return Some(ConfidenceReport::no_match(filtered));
                }
                let (tool_name, confidence) = select_best(&filtered, catalog)?;
                return Some(ConfidenceReport {
                    tool_name: Some(tool_name),
                    confidence,
                    scores: filtered,
                });
            }
        }

        // Single-answer form: a bare tool name plus confidence, accepted
        // only when the name resolves in the catalog.
        let tool_name = body.tool_name?;
        if !catalog.contains(&tool_name) {
            return None;
        }
        let confidence = body.confidence.unwrap_or(0.0);
        let scores = BTreeMap::from([(tool_name.clone(), confidence)]);
        Some(ConfidenceReport {
            tool_name: Some(tool_name),
            confidence,
            scores,
        })
    }
}

#[async_trait]
impl ConfidenceModel for RemoteConfidenceModel {
    async fn score(&self, message: &str, catalog: &ToolCatalog) -> ConfidenceReport {
        let body = match self.fetch(message, catalog).await {
            Ok(body) => body,
            Err(reason) => {
                warn!(url = %self.config.url, reason, "remote_scorer_fallback");
                return self.fallback.score(message, catalog).await;
            }
        };

        match Self::interpret(body, catalog) {
            Some(report) => report,
            None => {
                warn!(url = %self.config.url, "remote scorer returned no usable answer");
                self.fallback.score(message, catalog).await
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ScoreRequest {
    message: String,
    tools: Vec<ToolSummary>,
}

#[derive(Debug, Serialize)]
struct ToolSummary {
    name: String,
    description: String,
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ScoreResponse {
    #[serde(default)]
    scores: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    tool_name: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::confidence::KeywordConfidenceModel;
    use crate::domain::tools::builtin_catalog;
    use axum::routing::post;
    use axum::{Json, Router};

    /// Serves one canned score payload on a random local port.
    async fn spawn_scorer(payload: serde_json::Value) -> String {
        let app = Router::new().route(
            "/score",
            post(move || {
                let payload = payload.clone();
                async move { Json(payload) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/score")
    }

    fn remote_with_local_fallback(url: String) -> (RemoteConfidenceModel, Arc<KeywordConfidenceModel>) {
        let local = Arc::new(KeywordConfidenceModel::default());
        let remote =
            RemoteConfidenceModel::new(RemoteScorerConfig::new(url), local.clone()).unwrap();
        (remote, local)
    }

    #[tokio::test]
    async fn remote_scores_drive_the_selection() {
        let url = spawn_scorer(serde_json::json!({
            "scores": {
                "appointment_cancel": 0.9,
                "appointment_book": 0.1
            }
        }))
        .await;
        let (remote, _) = remote_with_local_fallback(url);
        let catalog = builtin_catalog();

        let report = remote.score("anything", &catalog).await;
        assert_eq!(report.tool_name.as_deref(), Some("appointment_cancel"));
        assert_eq!(report.confidence, 0.9);
        // Only the two returned tools appear in the distribution.
        assert_eq!(report.scores.len(), 2);
    }

    #[tokio::test]
    async fn remote_raw_scores_are_not_renormalized() {
        // A one-entry map must keep its raw value; inflating it to 1.0
        // would let a low-confidence selection skip the approval gate.
        let url = spawn_scorer(serde_json::json!({
            "scores": { "appointment_cancel": 0.2 }
        }))
        .await;
        let (remote, _) = remote_with_local_fallback(url);
        let catalog = builtin_catalog();

        let report = remote.score("cancel it", &catalog).await;
        assert_eq!(report.tool_name.as_deref(), Some("appointment_cancel"));
        assert_eq!(report.confidence, 0.2);
    }

    #[tokio::test]
    async fn single_answer_form_is_accepted_for_known_tools() {
        let url = spawn_scorer(serde_json::json!({
            "tool_name": "appointment_cancel",
            "confidence": 0.9
        }))
        .await;
        let (remote, _) = remote_with_local_fallback(url);
        let catalog = builtin_catalog();

        let report = remote.score("cancel it", &catalog).await;
        assert_eq!(report.tool_name.as_deref(), Some("appointment_cancel"));
        assert_eq!(report.confidence, 0.9);
        assert_eq!(report.scores.len(), 1);
    }

    #[tokio::test]
    async fn single_answer_form_with_unknown_tool_falls_back() {
        let url = spawn_scorer(serde_json::json!({
            "tool_name": "not_a_tool",
            "confidence": 0.9
        }))
        .await;
        let (remote, local) = remote_with_local_fallback(url);
        let catalog = builtin_catalog();

        let message = "I want to book an appointment";
        let via_remote = remote.score(message, &catalog).await;
        let via_local = local.score(message, &catalog).await;
        assert_eq!(via_remote.tool_name, via_local.tool_name);
        assert_eq!(via_remote.confidence, via_local.confidence);
    }

    #[tokio::test]
    async fn unknown_tool_names_are_discarded_and_trigger_fallback() {
        // Every returned name is outside the catalog, so the filtered map
        // is empty and the local model takes over.
        let url = spawn_scorer(serde_json::json!({
            "scores": { "not_a_tool": 0.9, "also_unknown": 0.4 }
        }))
        .await;
        let (remote, local) = remote_with_local_fallback(url);
        let catalog = builtin_catalog();

        let message = "I want to book an appointment";
        let via_remote = remote.score(message, &catalog).await;
        let via_local = local.score(message, &catalog).await;

        assert_eq!(via_remote.tool_name, via_local.tool_name);
        assert_eq!(via_remote.scores, via_local.scores);
    }

    #[tokio::test]
    async fn all_zero_remote_scores_mean_no_match() {
        let url = spawn_scorer(serde_json::json!({
            "scores": { "appointment_book": 0.0, "appointment_cancel": 0.0 }
        }))
        .await;
        let (remote, _) = remote_with_local_fallback(url);
        let catalog = builtin_catalog();

        let report = remote.score("gibberish", &catalog).await;
        assert_eq!(report.tool_name, None);
        assert_eq!(report.confidence, 0.0);
    }

    #[tokio::test]
    async fn request_carries_full_tool_metadata() {
        // The scoring service sees name, description, and keywords for
        // every tool, not bare names.
        let catalog = builtin_catalog();
        let request = ScoreRequest {
            message: "m".to_string(),
            tools: catalog
                .iter()
                .map(|t| ToolSummary {
                    name: t.name().to_string(),
                    description: t.description().to_string(),
                    keywords: t.keywords().to_vec(),
                })
                .collect(),
        };

        let json = serde_json::to_value(&request).unwrap();
        let first = &json["tools"][0];
        assert_eq!(first["name"], "service_catalog_search");
        assert!(first["description"].as_str().unwrap().contains("catalog"));
        assert!(first["keywords"].as_array().unwrap().len() >= 2);
    }

    #[tokio::test]
    async fn unreachable_scorer_falls_back_to_local_model() {
        let config = RemoteScorerConfig::new("http://127.0.0.1:1/score")
            .with_timeout(Duration::from_millis(200));
        let local = Arc::new(KeywordConfidenceModel::default());
        let remote = RemoteConfidenceModel::new(config, local.clone()).unwrap();
        let catalog = builtin_catalog();

        let message = "I want to book an appointment";
        let via_remote = remote.score(message, &catalog).await;
        let via_local = local.score(message, &catalog).await;

        // Fallback must be indistinguishable from the local model.
        assert_eq!(via_remote.tool_name, via_local.tool_name);
        assert_eq!(via_remote.confidence, via_local.confidence);
        assert_eq!(via_remote.scores, via_local.scores);
    }
}
