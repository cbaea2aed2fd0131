//! Context adjustment of the lexicon compound score.
//!
//! Three heuristics run in a fixed order: negation reversal, sarcasm
//! dampening, then the community recalibration. Only the compound term is
//! adjusted; fusion happens afterwards.

use crate::patterns::{PatternStore, BEARISH_CONTEXT, POSITIVE_ADJECTIVES, REVERSAL_WORDS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Share of the score a qualifying negation takes away
const NEGATION_REVERSAL: f64 = 0.5;

const SARCASM_INDICATOR_WEIGHT: f64 = 0.3;
const SARCASM_CONTRADICTION_WEIGHT: f64 = 0.4;
/// Sarcasm confidence above which the score is dampened
pub const SARCASM_THRESHOLD: f64 = 0.5;

/// Endings under which a losing-context word still counts ("crashed", "losses")
const INFLECTIONS: &[&str] = &["", "s", "es", "ed", "ing"];

/// Recalibration profile selected by the community tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum CommunityProfile {
    /// Meme-driven, hyperbolic: extremes are dampened
    HighVolatility,
    /// Analytical: weak signals are amplified
    Conservative,
    /// Penny-stock speculation: everything is amplified slightly
    Speculative,
    Unknown,
}

impl CommunityProfile {
    /// Resolve a community tag. Accepts "r/" prefixes and any casing.
    pub fn from_tag(tag: Option<&str>) -> Self {
        let Some(tag) = tag else {
            return CommunityProfile::Unknown;
        };
        let tag = tag.trim();
        let tag = tag
            .strip_prefix("r/")
            .or_else(|| tag.strip_prefix("R/"))
            .or_else(|| tag.strip_prefix("/r/"))
            .unwrap_or(tag)
            .to_lowercase();

        match tag.as_str() {
            "wallstreetbets" => CommunityProfile::HighVolatility,
            "investing" | "securityanalysis" | "valueinvesting" => CommunityProfile::Conservative,
            "pennystocks" => CommunityProfile::Speculative,
            _ => CommunityProfile::Unknown,
        }
    }

    pub fn apply(&self, score: f64) -> f64 {
        match self {
            CommunityProfile::HighVolatility if score.abs() > 0.5 => score * 0.8,
            CommunityProfile::Conservative if score.abs() < 0.3 => score * 1.2,
            CommunityProfile::Speculative => score * 1.1,
            _ => score,
        }
    }
}

/// Adjusted compound plus what each heuristic observed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextAdjustment {
    pub compound: f64,
    pub negation_applied: bool,
    pub sarcasm_confidence: f64,
    pub sarcasm_detected: bool,
    pub community: CommunityProfile,
}

pub struct ContextAdjuster {
    patterns: Arc<PatternStore>,
    negation_window_chars: usize,
}

impl ContextAdjuster {
    pub fn new(patterns: Arc<PatternStore>, negation_window_chars: usize) -> Self {
        Self {
            patterns,
            negation_window_chars,
        }
    }

    pub fn adjust(&self, text: &str, compound: f64, community: Option<&str>) -> ContextAdjustment {
        let lower = text.to_lowercase();
        let mut score = compound;

        let negation_applied = self.has_reversed_negation(&lower);
        if negation_applied {
            score -= score * NEGATION_REVERSAL;
        }

        let sarcasm_confidence = self.sarcasm_confidence(text, &lower);
        let sarcasm_detected = sarcasm_confidence > SARCASM_THRESHOLD;
        if sarcasm_detected {
            score *= 1.0 - sarcasm_confidence;
        }

        let community = CommunityProfile::from_tag(community);
        score = community.apply(score);

        ContextAdjustment {
            compound: score,
            negation_applied,
            sarcasm_confidence,
            sarcasm_detected,
            community,
        }
    }

    /// True when any negation cue has a reversal word within the look-ahead
    /// window. Several qualifying cues still reverse only once.
    fn has_reversed_negation(&self, lower: &str) -> bool {
        self.patterns.negation_cue_ends(lower).into_iter().any(|end| {
            let window: String = lower[end..].chars().take(self.negation_window_chars).collect();
            REVERSAL_WORDS.iter().any(|word| window.contains(word))
        })
    }

    /// 0.3 per indicator, plus 0.4 for praise in a losing context, capped at 1.
    pub fn sarcasm_confidence(&self, text: &str, lower: &str) -> f64 {
        let mut confidence = self.patterns.sarcasm_hits(text) as f64 * SARCASM_INDICATOR_WEIGHT;

        let words: HashSet<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let praise = POSITIVE_ADJECTIVES.iter().any(|w| words.contains(w));
        let losing = words
            .iter()
            .any(|word| BEARISH_CONTEXT.iter().any(|stem| is_inflection_of(word, stem)));
        if praise && losing {
            confidence += SARCASM_CONTRADICTION_WEIGHT;
        }

        confidence.min(1.0)
    }
}

fn is_inflection_of(word: &str, stem: &str) -> bool {
    word.strip_prefix(stem)
        .is_some_and(|ending| INFLECTIONS.contains(&ending))
}
