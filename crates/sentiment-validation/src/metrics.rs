use sentiment_core::weighted::{harmonic_mean, ratio, round4};
use sentiment_core::SentimentLabel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 3x3 count matrix, rows are true labels and columns predicted labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    cells: [[usize; 3]; 3],
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, truth: SentimentLabel, predicted: SentimentLabel) {
        self.cells[truth.index()][predicted.index()] += 1;
    }

    pub fn get(&self, truth: SentimentLabel, predicted: SentimentLabel) -> usize {
        self.cells[truth.index()][predicted.index()]
    }

    pub fn total(&self) -> usize {
        self.cells.iter().flatten().sum()
    }

    /// Samples whose true label is `truth`.
    pub fn row_total(&self, truth: SentimentLabel) -> usize {
        self.cells[truth.index()].iter().sum()
    }

    /// Samples predicted as `predicted`.
    pub fn column_total(&self, predicted: SentimentLabel) -> usize {
        self.cells.iter().map(|row| row[predicted.index()]).sum()
    }

    pub fn correct(&self) -> usize {
        SentimentLabel::ALL.iter().map(|l| self.get(*l, *l)).sum()
    }

    pub fn true_positives(&self, label: SentimentLabel) -> usize {
        self.get(label, label)
    }

    pub fn false_positives(&self, label: SentimentLabel) -> usize {
        self.column_total(label) - self.true_positives(label)
    }

    pub fn false_negatives(&self, label: SentimentLabel) -> usize {
        self.row_total(label) - self.true_positives(label)
    }

    pub fn true_negatives(&self, label: SentimentLabel) -> usize {
        self.total() - self.true_positives(label) - self.false_positives(label) - self.false_negatives(label)
    }

    /// One-vs-rest metrics for `label`.
    pub fn class_metrics(&self, label: SentimentLabel) -> ClassMetrics {
        let tp = self.true_positives(label);
        let fp = self.false_positives(label);
        let fn_ = self.false_negatives(label);

        let precision = ratio(tp as f64, (tp + fp) as f64);
        let recall = ratio(tp as f64, (tp + fn_) as f64);

        ClassMetrics {
            label,
            true_positives: tp,
            false_positives: fp,
            false_negatives: fn_,
            true_negatives: self.true_negatives(label),
            support: self.row_total(label),
            precision: round4(precision),
            recall: round4(recall),
            f1: round4(harmonic_mean(precision, recall)),
        }
    }

    /// Nested `true -> predicted -> count` map with every cell present.
    pub fn to_map(&self) -> BTreeMap<SentimentLabel, BTreeMap<SentimentLabel, usize>> {
        SentimentLabel::ALL
            .iter()
            .map(|truth| {
                let row = SentimentLabel::ALL
                    .iter()
                    .map(|predicted| (*predicted, self.get(*truth, *predicted)))
                    .collect();
                (*truth, row)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ClassMetrics {
    pub label: SentimentLabel,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
    /// Samples whose true label is this class
    pub support: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}
