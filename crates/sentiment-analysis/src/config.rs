use sentiment_core::SentimentError;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Tunables for the scoring engine.
///
/// Thresholds, fusion weights and adjustment factors are fixed and live next
/// to the code that uses them; only operational knobs are configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Leading characters checked against meta-thread signatures
    pub meta_prefix_chars: usize,
    /// Characters after a negation cue searched for a reversal word
    pub negation_window_chars: usize,
    /// Longer text is rejected by the statistical estimator
    pub max_text_chars: usize,
    /// Batches at least this large are scored on the rayon pool
    pub parallel_batch_threshold: usize,
    /// Round reported floats to 4 decimal places
    pub round_output: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            meta_prefix_chars: 200,
            negation_window_chars: 30,
            max_text_chars: 40_000,
            parallel_batch_threshold: 64,
            round_output: true,
        }
    }
}

impl ScoringConfig {
    /// Defaults overridden by `SENTIMENT_*` variables (a `.env` file is loaded first).
    pub fn from_env() -> Result<Self, SentimentError> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable name.
    pub fn from_source<F>(lookup: F) -> Result<Self, SentimentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            meta_prefix_chars: read(&lookup, "SENTIMENT_META_PREFIX_CHARS", defaults.meta_prefix_chars)?,
            negation_window_chars: read(
                &lookup,
                "SENTIMENT_NEGATION_WINDOW_CHARS",
                defaults.negation_window_chars,
            )?,
            max_text_chars: read(&lookup, "SENTIMENT_MAX_TEXT_CHARS", defaults.max_text_chars)?,
            parallel_batch_threshold: read(
                &lookup,
                "SENTIMENT_PARALLEL_BATCH_THRESHOLD",
                defaults.parallel_batch_threshold,
            )?,
            round_output: read(&lookup, "SENTIMENT_ROUND_OUTPUT", defaults.round_output)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SentimentError> {
        if self.meta_prefix_chars == 0 {
            return Err(SentimentError::Config("meta_prefix_chars must be positive".to_string()));
        }
        if self.negation_window_chars == 0 {
            return Err(SentimentError::Config("negation_window_chars must be positive".to_string()));
        }
        if self.max_text_chars == 0 {
            return Err(SentimentError::Config("max_text_chars must be positive".to_string()));
        }
        Ok(())
    }
}

fn read<F, T>(lookup: &F, key: &str, default: T) -> Result<T, SentimentError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| SentimentError::Config(format!("{key}: cannot parse `{raw}`"))),
        _ => Ok(default),
    }
}
