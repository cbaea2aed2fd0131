use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sentiment_core::{SentimentLabel, SentimentResult, TextItem};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const SEED_SAMPLES: &str = include_str!("../data/seed_samples.json");

/// What the scorer said about a sample during a validation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Prediction {
    pub label: SentimentLabel,
    pub score: f64,
    pub confidence: f64,
    pub predicted_at: DateTime<Utc>,
}

impl Prediction {
    pub fn from_result(result: &SentimentResult, predicted_at: DateTime<Utc>) -> Self {
        Self {
            label: result.label,
            score: result.score,
            confidence: result.confidence,
            predicted_at,
        }
    }
}

/// Human-labelled text with an optional prediction attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ValidationSample {
    #[serde(flatten)]
    pub item: TextItem,
    pub true_label: SentimentLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_score: Option<f64>,
    /// "synthetic", "reddit", ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,
}

impl ValidationSample {
    pub fn new(body: impl Into<String>, true_label: SentimentLabel) -> Self {
        Self {
            item: TextItem::new(body),
            true_label,
            true_score: None,
            source_type: None,
            notes: None,
            prediction: None,
        }
    }

    pub fn with_community(mut self, community: impl Into<String>) -> Self {
        self.item.community = Some(community.into());
        self
    }

    pub fn with_true_score(mut self, score: f64) -> Self {
        self.true_score = Some(score);
        self
    }

    pub fn with_prediction(mut self, prediction: Prediction) -> Self {
        self.prediction = Some(prediction);
        self
    }

    /// Replace any earlier prediction. Ground truth is never touched.
    pub fn record(&mut self, result: &SentimentResult, predicted_at: DateTime<Utc>) {
        self.prediction = Some(Prediction::from_result(result, predicted_at));
    }

    pub fn predicted_label(&self) -> Option<SentimentLabel> {
        self.prediction.as_ref().map(|p| p.label)
    }

    pub fn is_correct(&self) -> Option<bool> {
        self.predicted_label().map(|label| label == self.true_label)
    }
}

/// The bundled, hand-labelled seed corpus.
pub fn seed_samples() -> Result<Vec<ValidationSample>> {
    parse_samples(SEED_SAMPLES).context("Failed to parse bundled seed samples")
}

/// Parse a JSON array of samples.
pub fn parse_samples(json: &str) -> Result<Vec<ValidationSample>> {
    let samples: Vec<ValidationSample> =
        serde_json::from_str(json).context("Invalid validation sample JSON")?;
    Ok(samples)
}

/// Load samples from a JSON file.
pub fn load_samples(path: impl AsRef<Path>) -> Result<Vec<ValidationSample>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read validation samples from {}", path.display()))?;
    parse_samples(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}
