//! Confidence model - scores a free-text message against the tool catalog.
//!
//! The dispatcher depends only on the [`ConfidenceModel`] contract; the
//! lexical scorer here is the default implementation and also the fallback
//! target for the remote scorer adapter.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::tools::ToolCatalog;

/// Floor for the softmax temperature, so a misconfigured near-zero value
/// cannot blow up the division.
pub const MIN_TEMPERATURE: f64 = 0.1;

/// Outcome of scoring one message against the catalog.
///
/// If a tool is selected, its score equals `confidence` and is the maximum
/// of `scores`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceReport {
    /// Selected tool, or `None` when nothing matched.
    pub tool_name: Option<String>,
    /// Confidence in the selection, in [0, 1].
    pub confidence: f64,
    /// Score for every candidate tool.
    pub scores: BTreeMap<String, f64>,
}

impl ConfidenceReport {
    /// Report for a message that matched nothing.
    pub fn no_match(scores: BTreeMap<String, f64>) -> Self {
        Self {
            tool_name: None,
            confidence: 0.0,
            scores,
        }
    }
}

/// Selection policy contract used by the dispatcher.
#[async_trait]
pub trait ConfidenceModel: Send + Sync {
    /// Scores `message` against every tool in `catalog`.
    async fn score(&self, message: &str, catalog: &ToolCatalog) -> ConfidenceReport;
}

/// Lexical scorer: keyword density plus a temperature-scaled softmax.
#[derive(Debug, Clone)]
pub struct KeywordConfidenceModel {
    temperature: f64,
}

impl Default for KeywordConfidenceModel {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl KeywordConfidenceModel {
    /// Creates a scorer with the given softmax temperature (floored at 0.1).
    pub fn new(temperature: f64) -> Self {
        Self {
            temperature: temperature.max(MIN_TEMPERATURE),
        }
    }

    /// Returns the effective temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    fn raw_scores(message: &str, catalog: &ToolCatalog) -> BTreeMap<String, f64> {
        let text = message.to_lowercase();
        let mut raw = BTreeMap::new();

        for tool in catalog.iter() {
            let matches = tool
                .keywords()
                .iter()
                .filter(|kw| text.contains(kw.as_str()))
                .count();
            // Density, not count: long keyword lists neither penalize
            // nor advantage a tool.
            let score = if matches == 0 {
                0.0
            } else {
                matches as f64 / tool.keywords().len().max(1) as f64
            };
            raw.insert(tool.name().to_string(), score);
        }

        raw
    }
}

#[async_trait]
impl ConfidenceModel for KeywordConfidenceModel {
    async fn score(&self, message: &str, catalog: &ToolCatalog) -> ConfidenceReport {
        let raw = Self::raw_scores(message, catalog);

        // Zero matches everywhere: no selection, and no softmax either,
        // which would manufacture confidence out of noise.
        if raw.values().all(|&s| s == 0.0) {
            return ConfidenceReport::no_match(raw);
        }

        let scores = softmax(&raw, self.temperature);
        match select_best(&scores, catalog) {
            Some((tool_name, confidence)) => ConfidenceReport {
                tool_name: Some(tool_name),
                confidence,
                scores,
            },
            None => ConfidenceReport::no_match(scores),
        }
    }
}

/// Picks the highest-scoring tool, breaking ties in catalog registration
/// order rather than by name.
pub fn select_best(scores: &BTreeMap<String, f64>, catalog: &ToolCatalog) -> Option<(String, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for tool in catalog.iter() {
        let Some(&score) = scores.get(tool.name()) else {
            continue;
        };
        if best.map_or(true, |(_, current)| score > current) {
            best = Some((tool.name(), score));
        }
    }
    best.map(|(name, score)| (name.to_string(), score))
}

/// Numerically stable temperature-scaled softmax.
///
/// Subtracts the maximum raw score before exponentiating; returns all zeros
/// if the exponential total is zero.
pub fn softmax(scores: &BTreeMap<String, f64>, temperature: f64) -> BTreeMap<String, f64> {
    if scores.is_empty() {
        return BTreeMap::new();
    }

    let max_score = scores.values().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp_values: BTreeMap<String, f64> = scores
        .iter()
        .map(|(k, &s)| (k.clone(), ((s - max_score) / temperature).exp()))
        .collect();

    let total: f64 = exp_values.values().sum();
    if total == 0.0 {
        return scores.keys().map(|k| (k.clone(), 0.0)).collect();
    }

    exp_values.into_iter().map(|(k, v)| (k, v / total)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tools::builtin_catalog;

    #[tokio::test]
    async fn zero_keyword_match_returns_no_selection() {
        let model = KeywordConfidenceModel::default();
        let catalog = builtin_catalog();

        let report = model.score("completely unrelated gibberish", &catalog).await;

        assert_eq!(report.tool_name, None);
        assert_eq!(report.confidence, 0.0);
        assert!(report.scores.values().all(|&s| s == 0.0));
        assert_eq!(report.scores.len(), catalog.len());
    }

    #[tokio::test]
    async fn keyword_match_selects_argmax() {
        let model = KeywordConfidenceModel::default();
        let catalog = builtin_catalog();

        let report = model
            .score("I need a refill of my prescription medication", &catalog)
            .await;

        assert_eq!(report.tool_name.as_deref(), Some("prescription_refill"));
        let max = report
            .scores
            .values()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(report.confidence, max);
    }

    #[tokio::test]
    async fn confidence_is_a_probability() {
        let model = KeywordConfidenceModel::default();
        let catalog = builtin_catalog();

        for message in [
            "book an appointment",
            "cancel my visit",
            "check insurance coverage and eligibility",
            "talk to a human representative",
        ] {
            let report = model.score(message, &catalog).await;
            assert!(report.confidence >= 0.0 && report.confidence <= 1.0);
            let total: f64 = report.scores.values().sum();
            assert!((total - 1.0).abs() < 1e-9, "softmax sums to one");
        }
    }

    #[tokio::test]
    async fn lower_temperature_sharpens_distribution() {
        let catalog = builtin_catalog();
        let message = "reschedule my appointment";

        let soft = KeywordConfidenceModel::new(1.0).score(message, &catalog).await;
        let sharp = KeywordConfidenceModel::new(0.1).score(message, &catalog).await;

        assert_eq!(soft.tool_name, sharp.tool_name);
        assert!(sharp.confidence > soft.confidence);
    }

    #[tokio::test]
    async fn tied_scores_resolve_in_registration_order() {
        use crate::domain::tools::{FnHandler, ToolCatalog, ToolDescriptor};

        // Two tools share the single keyword that matches, so their
        // densities tie; the first registered wins, not the first
        // alphabetically.
        let mut catalog = ToolCatalog::new();
        for name in ["zeta_tool", "alpha_tool"] {
            catalog
                .register(ToolDescriptor::new(
                    name,
                    "Tied candidate.",
                    serde_json::json!({"type": "object", "properties": {}}),
                    Vec::<String>::new(),
                    ["ping"],
                    FnHandler(|_| Ok(serde_json::json!({"status": "ok"}))),
                ))
                .unwrap();
        }

        let report = KeywordConfidenceModel::default()
            .score("ping", &catalog)
            .await;
        assert_eq!(report.tool_name.as_deref(), Some("zeta_tool"));
    }

    #[test]
    fn temperature_is_floored() {
        let model = KeywordConfidenceModel::new(0.0);
        assert_eq!(model.temperature(), MIN_TEMPERATURE);

        let model = KeywordConfidenceModel::new(-3.0);
        assert_eq!(model.temperature(), MIN_TEMPERATURE);
    }

    #[test]
    fn softmax_of_empty_map_is_empty() {
        assert!(softmax(&BTreeMap::new(), 1.0).is_empty());
    }

    #[test]
    fn softmax_is_stable_for_large_scores() {
        let mut scores = BTreeMap::new();
        scores.insert("a".to_string(), 1e6);
        scores.insert("b".to_string(), 1e6 - 1.0);

        let result = softmax(&scores, 1.0);
        assert!(result.values().all(|v| v.is_finite()));
        assert!(result["a"] > result["b"]);
    }
}
