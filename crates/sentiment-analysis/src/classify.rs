use sentiment_core::SentimentLabel;

/// Methods further apart than this are treated as disagreeing.
pub const DISAGREEMENT_THRESHOLD: f64 = 0.5;
/// Confidence multiplier when the two methods disagree
pub const DISAGREEMENT_PENALTY: f64 = 0.7;

/// Label a final score with the fixed thresholds.
pub fn classify(score: f64) -> SentimentLabel {
    SentimentLabel::from_score(score)
}

/// Confidence in a final score.
///
/// Starts from the score magnitude, is cut by the disagreement penalty when
/// the compound and statistical estimates are far apart, and is scaled into
/// 50-100% by subjectivity: opinionated text is trusted more.
pub fn confidence(final_score: f64, compound: f64, polarity: f64, subjectivity: f64) -> f64 {
    let mut confidence = final_score.abs();
    if (compound - polarity).abs() > DISAGREEMENT_THRESHOLD {
        confidence *= DISAGREEMENT_PENALTY;
    }
    let subjectivity = subjectivity.clamp(0.0, 1.0);
    (confidence * (0.5 + 0.5 * subjectivity)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(0.10), SentimentLabel::Positive);
        assert_eq!(classify(0.099), SentimentLabel::Neutral);
        assert_eq!(classify(-0.10), SentimentLabel::Negative);
        assert_eq!(classify(0.0), SentimentLabel::Neutral);
    }

    #[test]
    fn test_confidence_agreeing_methods() {
        assert_relative_eq!(confidence(0.6, 0.7, 0.5, 1.0), 0.6, epsilon = 1e-12);
        assert_relative_eq!(confidence(0.6, 0.7, 0.5, 0.0), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_confidence_disagreement_penalty() {
        assert_relative_eq!(confidence(0.6, 0.9, -0.2, 1.0), 0.42, epsilon = 1e-12);
    }

    #[test]
    fn test_confidence_is_bounded() {
        assert_eq!(confidence(0.0, 0.0, 0.0, 0.5), 0.0);
        assert!(confidence(-1.0, -1.0, -1.0, 1.0) <= 1.0);
        assert!(confidence(-0.8, 0.3, 0.3, 2.0) <= 1.0);
    }
}
