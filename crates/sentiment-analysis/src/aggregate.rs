//! Roll-up of many scored items into one summary.

use sentiment_core::weighted::{mean, round4, std_dev, weighted_mean};
use sentiment_core::{AggregateSentiment, LabelCounts, SentimentLabel, SentimentResult};

/// Aggregate a slice of results. Filtered items are counted but never weighted.
pub fn aggregate(results: &[SentimentResult]) -> AggregateSentiment {
    aggregate_iter(results)
}

/// Aggregate any iterator of borrowed results.
///
/// Score is the confidence-weighted mean (uniform weights when every
/// confidence is zero) and the label is derived from that mean, so a batch
/// of weakly-positive items can still read neutral overall.
pub fn aggregate_iter<'a, I>(results: I) -> AggregateSentiment
where
    I: IntoIterator<Item = &'a SentimentResult>,
{
    let mut filtered_items = 0;
    let scored: Vec<&SentimentResult> = results
        .into_iter()
        .filter(|r| {
            if r.filtered {
                filtered_items += 1;
            }
            !r.filtered
        })
        .collect();

    if scored.is_empty() {
        return AggregateSentiment {
            filtered_items,
            ..AggregateSentiment::empty()
        };
    }

    let score = round4(weighted_mean(scored.iter().map(|r| (r.score, r.confidence))));
    let scores: Vec<f64> = scored.iter().map(|r| r.score).collect();
    let confidences: Vec<f64> = scored.iter().map(|r| r.confidence).collect();
    let counts: LabelCounts = scored.iter().map(|r| r.label).collect();

    AggregateSentiment {
        score,
        label: SentimentLabel::from_score(score),
        confidence: round4(mean(&confidences)),
        score_std_dev: round4(std_dev(&scores)),
        total_items: scored.len(),
        filtered_items,
        counts,
        positive_pct: round4(counts.proportion(SentimentLabel::Positive)),
        negative_pct: round4(counts.proportion(SentimentLabel::Negative)),
        neutral_pct: round4(counts.proportion(SentimentLabel::Neutral)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sentiment_core::{FilterReason, ScoringMethod};

    fn result(score: f64, confidence: f64) -> SentimentResult {
        SentimentResult {
            score,
            label: SentimentLabel::from_score(score),
            confidence,
            lexicon_compound: score,
            statistical_polarity: 0.0,
            subjectivity: 0.5,
            sarcasm_confidence: 0.0,
            sarcasm_detected: false,
            positive: 0.0,
            negative: 0.0,
            neutral: 1.0,
            filtered: false,
            filter_reason: None,
            method: ScoringMethod::Fused,
        }
    }

    #[test]
    fn test_single_item_is_identity() {
        let item = result(0.4215, 0.3161);
        let agg = aggregate(&[item.clone()]);
        assert_eq!(agg.score, item.score);
        assert_eq!(agg.label, item.label);
        assert_eq!(agg.total_items, 1);
        assert_eq!(agg.proportion(SentimentLabel::Positive), 1.0);
        assert_eq!(agg.proportion(SentimentLabel::Negative), 0.0);
        assert_eq!(agg.proportion(SentimentLabel::Neutral), 0.0);
        assert_eq!(agg.score_std_dev, 0.0);
    }

    #[test]
    fn test_empty() {
        let agg = aggregate(&[]);
        assert_eq!(agg, AggregateSentiment::empty());
        assert_eq!(agg.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_confidence_weighting() {
        let agg = aggregate(&[result(0.8, 0.6), result(-0.4, 0.2)]);
        assert_relative_eq!(agg.score, 0.5, epsilon = 1e-12);
        assert_eq!(agg.label, SentimentLabel::Positive);
        assert_relative_eq!(agg.confidence, 0.4, epsilon = 1e-12);
        assert_eq!(agg.counts.positive, 1);
        assert_eq!(agg.counts.negative, 1);
        assert_relative_eq!(agg.positive_pct, 0.5);
    }

    #[test]
    fn test_zero_confidence_falls_back_to_uniform() {
        let agg = aggregate(&[result(0.05, 0.0), result(0.25, 0.0)]);
        assert_relative_eq!(agg.score, 0.15, epsilon = 1e-12);
        assert_eq!(agg.label, SentimentLabel::Positive);
    }

    #[test]
    fn test_filtered_items_excluded() {
        let results = vec![
            result(0.6, 0.5),
            SentimentResult::filtered(FilterReason::Bot),
            SentimentResult::filtered(FilterReason::MetaThread),
        ];
        let agg = aggregate(&results);
        assert_eq!(agg.total_items, 1);
        assert_eq!(agg.filtered_items, 2);
        assert_eq!(agg.counts.total(), 1);
        assert_relative_eq!(agg.score, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_only_filtered_items() {
        let agg = aggregate(&[SentimentResult::filtered(FilterReason::Bot)]);
        assert_eq!(agg.total_items, 0);
        assert_eq!(agg.filtered_items, 1);
        assert_eq!(agg.score, 0.0);
        assert_eq!(agg.positive_pct, 0.0);
    }

    #[test]
    fn test_spread() {
        let agg = aggregate(&[result(0.2, 1.0), result(0.4, 1.0), result(0.6, 1.0)]);
        assert_relative_eq!(agg.score_std_dev, 0.2, epsilon = 1e-12);
    }
}
