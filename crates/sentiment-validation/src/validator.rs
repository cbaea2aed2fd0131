use chrono::{DateTime, Utc};
use sentiment_core::weighted::{ratio, round4, weighted_mean};
use sentiment_core::{LabelCounts, SentimentError, SentimentLabel, SentimentScorer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::metrics::{ClassMetrics, ConfusionMatrix};
use crate::sample::ValidationSample;

/// Accuracy of the scorer over a labelled sample set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AccuracyReport {
    /// Samples that carried a prediction
    pub total_samples: usize,
    pub accuracy: f64,
    pub precision_positive: f64,
    pub precision_negative: f64,
    pub precision_neutral: f64,
    pub recall_positive: f64,
    pub recall_negative: f64,
    pub recall_neutral: f64,
    pub f1_positive: f64,
    pub f1_negative: f64,
    pub f1_neutral: f64,
    /// Unweighted mean of the three per-class F1 scores
    pub macro_f1: f64,
    /// true label -> predicted label -> count
    pub confusion_matrix: BTreeMap<SentimentLabel, BTreeMap<SentimentLabel, usize>>,
    pub per_class: Vec<ClassMetrics>,
    /// True-label distribution of the measured samples
    pub label_distribution: LabelCounts,
    /// Indices (into the input slice) of wrongly predicted samples
    pub misclassified: Vec<usize>,
    /// Most recent prediction timestamp
    pub last_validated: Option<DateTime<Utc>>,
}

impl AccuracyReport {
    pub fn class(&self, label: SentimentLabel) -> &ClassMetrics {
        &self.per_class[label.index()]
    }
}

/// Build a report from samples that already carry predictions.
///
/// Unpredicted samples are skipped. No samples at all, or none with a
/// prediction, is `SentimentError::NoData` rather than a 0% report.
pub fn compute_report(samples: &[ValidationSample]) -> Result<AccuracyReport, SentimentError> {
    if samples.is_empty() {
        return Err(SentimentError::NoData("no validation samples".to_string()));
    }

    let mut matrix = ConfusionMatrix::new();
    let mut label_distribution = LabelCounts::default();
    let mut misclassified = Vec::new();
    let mut last_validated: Option<DateTime<Utc>> = None;

    for (index, sample) in samples.iter().enumerate() {
        let Some(prediction) = &sample.prediction else {
            continue;
        };
        matrix.record(sample.true_label, prediction.label);
        label_distribution.add(sample.true_label);
        if prediction.label != sample.true_label {
            misclassified.push(index);
        }
        last_validated = last_validated.max(Some(prediction.predicted_at));
    }

    let total = matrix.total();
    if total == 0 {
        return Err(SentimentError::NoData(format!(
            "none of {} samples carry a prediction",
            samples.len()
        )));
    }

    let per_class: Vec<ClassMetrics> = SentimentLabel::ALL
        .iter()
        .map(|label| matrix.class_metrics(*label))
        .collect();
    let macro_f1 = round4(weighted_mean(per_class.iter().map(|m| (m.f1, 1.0))));

    let [pos, neg, neu] = [&per_class[0], &per_class[1], &per_class[2]];
    Ok(AccuracyReport {
        total_samples: total,
        accuracy: round4(ratio(matrix.correct() as f64, total as f64)),
        precision_positive: pos.precision,
        precision_negative: neg.precision,
        precision_neutral: neu.precision,
        recall_positive: pos.recall,
        recall_negative: neg.recall,
        recall_neutral: neu.recall,
        f1_positive: pos.f1,
        f1_negative: neg.f1,
        f1_neutral: neu.f1,
        macro_f1,
        confusion_matrix: matrix.to_map(),
        per_class: per_class.clone(),
        label_distribution,
        misclassified,
        last_validated,
    })
}

/// Runs a scorer over labelled samples and measures it.
pub struct AccuracyValidator<S: SentimentScorer> {
    scorer: S,
}

impl<S: SentimentScorer> AccuracyValidator<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Score every sample (overwriting earlier predictions) and report.
    pub fn run(&self, samples: &mut [ValidationSample]) -> Result<AccuracyReport, SentimentError> {
        self.run_at(samples, Utc::now())
    }

    /// As [`run`](Self::run), stamping predictions with `predicted_at`.
    pub fn run_at(
        &self,
        samples: &mut [ValidationSample],
        predicted_at: DateTime<Utc>,
    ) -> Result<AccuracyReport, SentimentError> {
        let items: Vec<_> = samples.iter().map(|s| s.item.clone()).collect();
        let results = self.scorer.score_all(&items);
        for (sample, result) in samples.iter_mut().zip(&results) {
            sample.record(result, predicted_at);
        }

        let report = compute_report(samples)?;
        info!(
            samples = report.total_samples,
            accuracy = report.accuracy,
            macro_f1 = report.macro_f1,
            "Validation run complete"
        );
        Ok(report)
    }

    /// Report on predictions already attached to `samples`.
    pub fn report(&self, samples: &[ValidationSample]) -> Result<AccuracyReport, SentimentError> {
        compute_report(samples)
    }
}
