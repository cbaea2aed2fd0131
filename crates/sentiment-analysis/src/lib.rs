use rayon::prelude::*;
use sentiment_core::weighted::round4;
use sentiment_core::{
    AggregateSentiment, FilterReason, PolarityEstimate, PolarityEstimator, ScoringMethod,
    SentimentError, SentimentResult, SentimentScorer, TextItem,
};
use std::sync::Arc;

pub mod aggregate;
pub mod classify;
pub mod compound;
pub mod config;
pub mod context;
pub mod lexicon;
pub mod patterns;
pub mod polarity;
pub mod tickers;
pub mod trending;

pub use aggregate::{aggregate, aggregate_iter};
pub use classify::{classify, confidence};
pub use compound::{CompoundScorer, LexiconScores};
pub use config::ScoringConfig;
pub use context::{CommunityProfile, ContextAdjuster, ContextAdjustment};
pub use lexicon::Lexicon;
pub use patterns::PatternStore;
pub use polarity::{PatternPolarityEstimator, SubjectivityLexicon};
pub use tickers::TickerExtractor;
pub use trending::{
    daily_summaries, market_summary, mentions_from_item, rank_trending, DailyTickerSentiment,
    MarketMood, MarketSummary, MentionSource, TickerMention, TrendingTicker, TrendingWindow,
};

/// Weight of the (adjusted) lexicon compound in the fused score
pub const LEXICON_WEIGHT: f64 = 0.8;
/// Weight of the statistical polarity in the fused score
pub const STATISTICAL_WEIGHT: f64 = 0.2;

/// Blend the adjusted compound with the statistical polarity, clamped to [-1, 1].
pub fn fuse(compound: f64, polarity: f64) -> f64 {
    (LEXICON_WEIGHT * compound + STATISTICAL_WEIGHT * polarity).clamp(-1.0, 1.0)
}

/// Sentiment engine for informal finance chatter (Reddit posts and comments).
///
/// Holds only immutable lookup tables, so one instance can be shared across
/// threads and called concurrently.
pub struct FinancialSentimentEngine {
    config: ScoringConfig,
    patterns: Arc<PatternStore>,
    compound: CompoundScorer,
    estimator: Arc<dyn PolarityEstimator>,
    context: ContextAdjuster,
}

impl FinancialSentimentEngine {
    /// Engine with the bundled lexicons and default configuration.
    pub fn new() -> Result<Self, SentimentError> {
        Self::with_config(ScoringConfig::default())
    }

    pub fn with_config(config: ScoringConfig) -> Result<Self, SentimentError> {
        config.validate()?;
        let lexicon = Arc::new(Lexicon::financial()?);
        let patterns = Arc::new(PatternStore::new()?);
        let subjectivity = Arc::new(SubjectivityLexicon::bundled()?);
        let estimator = Arc::new(PatternPolarityEstimator::new(subjectivity, config.max_text_chars));

        tracing::debug!(
            terms = lexicon.len(),
            phrases = lexicon.phrases().len(),
            "Loaded sentiment lexicon"
        );

        Ok(Self::from_parts(config, lexicon, patterns, estimator))
    }

    /// Assemble an engine from injected tables and estimator.
    pub fn from_parts(
        config: ScoringConfig,
        lexicon: Arc<Lexicon>,
        patterns: Arc<PatternStore>,
        estimator: Arc<dyn PolarityEstimator>,
    ) -> Self {
        let context = ContextAdjuster::new(Arc::clone(&patterns), config.negation_window_chars);
        Self {
            compound: CompoundScorer::new(lexicon),
            estimator,
            context,
            patterns,
            config,
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Bot signatures anywhere, meta-thread signatures in the leading prefix.
    pub fn detect_filtered(&self, text: &str) -> Option<FilterReason> {
        if self.patterns.is_bot(text) {
            return Some(FilterReason::Bot);
        }
        let prefix: String = text.chars().take(self.config.meta_prefix_chars).collect();
        if self.patterns.is_meta(&prefix) {
            return Some(FilterReason::MetaThread);
        }
        None
    }

    /// Score one text. Never fails: filtered content and sub-analyzer
    /// errors both produce well-defined results.
    pub fn score_text(&self, text: &str, community: Option<&str>) -> SentimentResult {
        if let Some(reason) = self.detect_filtered(text) {
            tracing::debug!(reason = ?reason, community = ?community, "Skipping filtered content");
            return SentimentResult::filtered(reason);
        }

        let lexicon = self.compound.score(text);
        let estimate = self.estimate_polarity(text);
        let adjusted = self.context.adjust(text, lexicon.compound, community);

        let score = self.report(fuse(adjusted.compound, estimate.polarity));
        let confidence = self.report(confidence(
            score,
            adjusted.compound,
            estimate.polarity,
            estimate.subjectivity,
        ));

        SentimentResult {
            score,
            label: classify(score),
            confidence,
            lexicon_compound: self.report(adjusted.compound),
            statistical_polarity: self.report(estimate.polarity),
            subjectivity: self.report(estimate.subjectivity),
            sarcasm_confidence: self.report(adjusted.sarcasm_confidence),
            sarcasm_detected: adjusted.sarcasm_detected,
            positive: self.report(lexicon.positive),
            negative: self.report(lexicon.negative),
            neutral: self.report(lexicon.neutral),
            filtered: false,
            filter_reason: None,
            method: ScoringMethod::Fused,
        }
    }

    /// Score independent items, on the rayon pool once the batch is large enough.
    pub fn score_batch(&self, items: &[TextItem]) -> Vec<SentimentResult> {
        let parallel = items.len() >= self.config.parallel_batch_threshold;
        tracing::debug!(items = items.len(), parallel, "Scoring batch");

        if parallel {
            items.par_iter().map(|item| self.score(item)).collect()
        } else {
            items.iter().map(|item| self.score(item)).collect()
        }
    }

    /// Score a batch and roll it up.
    pub fn aggregate(&self, items: &[TextItem]) -> AggregateSentiment {
        aggregate(&self.score_batch(items))
    }

    /// Statistical estimate, or the neutral fallback when the estimator rejects the text.
    pub fn estimate_polarity(&self, text: &str) -> PolarityEstimate {
        match self.estimator.estimate(text) {
            Ok(estimate) => estimate,
            Err(e) => {
                tracing::warn!(
                    estimator = self.estimator.name(),
                    "Polarity estimator failed, using fallback: {}",
                    e
                );
                PolarityEstimate::FALLBACK
            }
        }
    }

    fn report(&self, value: f64) -> f64 {
        if self.config.round_output {
            round4(value)
        } else {
            value
        }
    }
}

impl SentimentScorer for FinancialSentimentEngine {
    fn score(&self, item: &TextItem) -> SentimentResult {
        self.score_text(&item.body, item.community.as_deref())
    }

    fn score_all(&self, items: &[TextItem]) -> Vec<SentimentResult> {
        self.score_batch(items)
    }
}
