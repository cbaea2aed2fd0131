//! Compound scorer for informal social-media text.
//!
//! Runs VADER over the merged finance lexicon. The text first goes through
//! [`Lexicon::prepare`] so emoji and multi-word slang reach the analyzer as
//! single lexicon tokens, where its booster, negation, caps and "but" rules
//! apply to them like any other word.

use crate::lexicon::Lexicon;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Compound value plus the positive/negative/neutral split of the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LexiconScores {
    pub compound: f64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

pub struct CompoundScorer {
    lexicon: Arc<Lexicon>,
}

impl CompoundScorer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn score(&self, text: &str) -> LexiconScores {
        let prepared = self.lexicon.prepare(text);
        let analyzer = SentimentIntensityAnalyzer::from_lexicon(self.lexicon.valences());
        let scores = analyzer.polarity_scores(&prepared);
        let value = |key: &str| scores.get(key).copied().unwrap_or_default();

        let positive = value("pos");
        let negative = value("neg");
        // No scored token: punctuation emphasis alone carries no polarity
        let compound = if positive == 0.0 && negative == 0.0 {
            0.0
        } else {
            value("compound")
        };

        LexiconScores {
            compound,
            positive,
            negative,
            neutral: value("neu"),
        }
    }
}
