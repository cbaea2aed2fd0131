use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SentimentError {
    /// Nothing to measure yet: no samples, or none carrying a prediction.
    #[error("No data: {0}")]
    NoData(String),

    #[error("Invalid label: {0}")]
    InvalidLabel(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid lexicon entry: {0}")]
    InvalidLexicon(String),

    #[error("Estimator error: {0}")]
    Estimator(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SentimentError {
    /// True for the "nothing measured yet" condition, as opposed to a real failure.
    pub fn is_no_data(&self) -> bool {
        matches!(self, SentimentError::NoData(_))
    }
}
