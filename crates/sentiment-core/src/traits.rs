use crate::{PolarityEstimate, SentimentError, SentimentResult, TextItem};

/// Trait for statistical polarity/subjectivity estimators
///
/// Implementations may reject input they cannot handle; the caller decides
/// what fallback to use.
pub trait PolarityEstimator: Send + Sync {
    fn name(&self) -> &'static str;

    fn estimate(&self, text: &str) -> Result<PolarityEstimate, SentimentError>;
}

/// Trait for per-item sentiment scorers
///
/// Scoring is infallible: every string, including the empty one, produces a
/// result.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, item: &TextItem) -> SentimentResult;

    fn score_all(&self, items: &[TextItem]) -> Vec<SentimentResult> {
        items.iter().map(|item| self.score(item)).collect()
    }
}
