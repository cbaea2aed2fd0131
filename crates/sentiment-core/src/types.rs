use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::SentimentError;

/// Scores at or above this are labelled positive.
pub const POSITIVE_THRESHOLD: f64 = 0.1;
/// Scores at or below this are labelled negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

/// Three-way sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Every label, in confusion-matrix order.
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    /// Label a score with the fixed thresholds. NaN falls through to neutral.
    pub fn from_score(score: f64) -> Self {
        if score >= POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if score <= NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }

    /// Row/column position in a 3x3 matrix
    pub fn index(&self) -> usize {
        match self {
            SentimentLabel::Positive => 0,
            SentimentLabel::Negative => 1,
            SentimentLabel::Neutral => 2,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = SentimentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            other => Err(SentimentError::InvalidLabel(other.to_string())),
        }
    }
}

/// Per-label tallies shared by aggregates, roll-ups and validation reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LabelCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl LabelCounts {
    pub fn add(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }

    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Share of `label` in the tally; 0.0 when empty.
    pub fn proportion(&self, label: SentimentLabel) -> f64 {
        crate::weighted::ratio(self.get(label) as f64, self.total() as f64)
    }
}

impl FromIterator<SentimentLabel> for LabelCounts {
    fn from_iter<I: IntoIterator<Item = SentimentLabel>>(iter: I) -> Self {
        let mut counts = LabelCounts::default();
        for label in iter {
            counts.add(label);
        }
        counts
    }
}

/// One unit of text handed over by a collector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TextItem {
    pub body: String,
    /// Originating community (subreddit), the only metadata the scorer reads
    #[serde(default)]
    pub community: Option<String>,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub tickers: Vec<String>,
}

impl TextItem {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn with_community(mut self, community: impl Into<String>) -> Self {
        self.community = Some(community.into());
        self
    }

    pub fn with_post_id(mut self, post_id: impl Into<String>) -> Self {
        self.post_id = Some(post_id.into());
        self
    }

    pub fn with_tickers(mut self, tickers: Vec<String>) -> Self {
        self.tickers = tickers;
        self
    }
}

/// Why an item was excluded from scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum FilterReason {
    /// Automated account or moderator bot signature
    Bot,
    /// Recurring scheduled/meta thread
    MetaThread,
}

/// How a result was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ScoringMethod {
    /// Lexicon compound fused with the statistical estimate
    Fused,
    /// Short-circuited by the bot/meta filter
    Filtered,
}

/// Output of the statistical polarity/subjectivity estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PolarityEstimate {
    /// -1.0 (negative) to 1.0 (positive)
    pub polarity: f64,
    /// 0.0 (factual) to 1.0 (opinionated)
    pub subjectivity: f64,
}

impl PolarityEstimate {
    /// Used when the estimator rejects its input.
    pub const FALLBACK: PolarityEstimate = PolarityEstimate {
        polarity: 0.0,
        subjectivity: 0.5,
    };

    /// Nothing opinion-bearing was found.
    pub const NONE: PolarityEstimate = PolarityEstimate {
        polarity: 0.0,
        subjectivity: 0.0,
    };
}

/// Scored sentiment for a single text item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SentimentResult {
    /// Fused score, -1.0 to 1.0
    pub score: f64,
    pub label: SentimentLabel,
    /// 0.0 to 1.0
    pub confidence: f64,
    /// Lexicon compound after negation/sarcasm/community adjustment
    pub lexicon_compound: f64,
    pub statistical_polarity: f64,
    pub subjectivity: f64,
    pub sarcasm_confidence: f64,
    pub sarcasm_detected: bool,
    /// Share of positive, negative and neutral lexicon mass
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub filtered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_reason: Option<FilterReason>,
    pub method: ScoringMethod,
}

impl SentimentResult {
    /// Result for bot/meta content: zero score, zero confidence, neutral.
    pub fn filtered(reason: FilterReason) -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
            confidence: 0.0,
            lexicon_compound: 0.0,
            statistical_polarity: 0.0,
            subjectivity: 0.0,
            sarcasm_confidence: 0.0,
            sarcasm_detected: false,
            positive: 0.0,
            negative: 0.0,
            neutral: 0.0,
            filtered: true,
            filter_reason: Some(reason),
            method: ScoringMethod::Filtered,
        }
    }

    pub fn is_scored(&self) -> bool {
        !self.filtered
    }
}

/// Roll-up of many results (for a ticker, window or batch)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AggregateSentiment {
    /// Confidence-weighted mean score
    pub score: f64,
    pub label: SentimentLabel,
    /// Mean per-item confidence
    pub confidence: f64,
    /// Sample standard deviation of item scores
    pub score_std_dev: f64,
    /// Items that contributed (filtered items excluded)
    pub total_items: usize,
    /// Items dropped as bot/meta content
    pub filtered_items: usize,
    pub counts: LabelCounts,
    pub positive_pct: f64,
    pub negative_pct: f64,
    pub neutral_pct: f64,
}

impl AggregateSentiment {
    /// The well-defined aggregate of nothing.
    pub fn empty() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
            confidence: 0.0,
            score_std_dev: 0.0,
            total_items: 0,
            filtered_items: 0,
            counts: LabelCounts::default(),
            positive_pct: 0.0,
            negative_pct: 0.0,
            neutral_pct: 0.0,
        }
    }

    pub fn proportion(&self, label: SentimentLabel) -> f64 {
        match label {
            SentimentLabel::Positive => self.positive_pct,
            SentimentLabel::Negative => self.negative_pct,
            SentimentLabel::Neutral => self.neutral_pct,
        }
    }
}

impl Default for AggregateSentiment {
    fn default() -> Self {
        Self::empty()
    }
}
