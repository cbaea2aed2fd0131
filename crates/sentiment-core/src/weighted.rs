//! Weighted aggregation utilities shared by every roll-up in the workspace.
//!
//! Item aggregates, per-ticker trending and validation macro-F1 all reduce to
//! "mean of values under some weights". Keeping the arithmetic here means the
//! empty-set and zero-weight edge cases are decided exactly once.

use statrs::statistics::Statistics;

/// Decimal places used for every reported float.
pub const REPORT_DECIMALS: i32 = 4;

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Compute sample standard deviation. Fewer than two points have no spread.
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    data.iter().std_dev()
}

/// Weighted mean of `(value, weight)` pairs.
///
/// Negative weights count as zero. When the total weight is zero every value
/// gets weight 1 instead, so an all-zero-confidence batch still has a mean.
/// An empty input yields 0.0.
pub fn weighted_mean<I>(pairs: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let pairs: Vec<(f64, f64)> = pairs.into_iter().collect();
    if pairs.is_empty() {
        return 0.0;
    }

    let total_weight: f64 = pairs.iter().map(|(_, w)| w.max(0.0)).sum();
    if total_weight <= f64::EPSILON {
        let values: Vec<f64> = pairs.iter().map(|(v, _)| *v).collect();
        return mean(&values);
    }

    pairs.iter().map(|(v, w)| v * w.max(0.0)).sum::<f64>() / total_weight
}

/// `numerator / denominator`, or 0.0 when the denominator is zero.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Harmonic mean of two non-negative rates; 0.0 when both are zero.
pub fn harmonic_mean(a: f64, b: f64) -> f64 {
    if a + b == 0.0 {
        0.0
    } else {
        2.0 * a * b / (a + b)
    }
}

/// Round to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Round to reporting precision.
pub fn round4(value: f64) -> f64 {
    round_to(value, REPORT_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_std_dev() {
        assert_eq!(mean(&[]), 0.0);
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
        assert_eq!(std_dev(&[0.4]), 0.0);
        assert_relative_eq!(std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.138089935299395, epsilon = 1e-12);
    }

    #[test]
    fn test_weighted_mean() {
        let m = weighted_mean(vec![(1.0, 3.0), (-1.0, 1.0)]);
        assert_relative_eq!(m, 0.5);
    }

    #[test]
    fn test_weighted_mean_zero_weights_falls_back_to_uniform() {
        let m = weighted_mean(vec![(0.6, 0.0), (0.2, 0.0)]);
        assert_relative_eq!(m, 0.4);
    }

    #[test]
    fn test_weighted_mean_empty() {
        assert_eq!(weighted_mean(Vec::<(f64, f64)>::new()), 0.0);
    }

    #[test]
    fn test_weighted_mean_ignores_negative_weights() {
        let m = weighted_mean(vec![(1.0, 1.0), (-1.0, -5.0)]);
        assert_relative_eq!(m, 1.0);
    }

    #[test]
    fn test_ratio_and_harmonic_mean() {
        assert_eq!(ratio(3.0, 0.0), 0.0);
        assert_relative_eq!(ratio(1.0, 4.0), 0.25);
        assert_eq!(harmonic_mean(0.0, 0.0), 0.0);
        assert_relative_eq!(harmonic_mean(1.0, 1.0), 1.0);
        assert_relative_eq!(harmonic_mean(0.5, 1.0), 2.0 / 3.0);
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(round4(-0.56789), -0.5679);
        assert_eq!(round4(0.0), 0.0);
    }
}
