//! Statistical utility functions.
//!
//! All functions return `None` on an empty population instead of producing NaN,
//! so callers decide how an empty window is reported.

use std::cmp::Ordering;

/// Consistency constant turning a MAD into a standard-deviation estimate under normality.
pub const MAD_SCALE: f64 = 1.4826;

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

fn median_of_sorted(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 0 {
        Some(sorted[n / 2 - 1] / 2.0 + sorted[n / 2] / 2.0)
    } else {
        Some(sorted[n / 2])
    }
}

/// Calculate the median of a slice.
///
/// # Example
/// ```
/// use methane_anomaly::utils::median;
///
/// assert_eq!(median(&[5.0, 1.0, 3.0]), Some(3.0));
/// assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
/// assert_eq!(median(&[]), None);
/// ```
pub fn median(values: &[f64]) -> Option<f64> {
    median_of_sorted(&sorted_copy(values))
}

/// Median absolute deviation around a precomputed center (unscaled).
pub fn median_absolute_deviation(values: &[f64], center: f64) -> Option<f64> {
    let deviations: Vec<f64> = values.iter().map(|x| (x - center).abs()).collect();
    median(&deviations)
}

/// Robust scale estimate: `1.4826 × MAD`.
pub fn robust_scale(values: &[f64], center: f64) -> Option<f64> {
    median_absolute_deviation(values, center).map(|mad| MAD_SCALE * mad)
}

/// The `q`-th percentile (`0 ≤ q ≤ 100`) with linear interpolation between
/// closest ranks.
///
/// Out-of-range `q` is clamped.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted_copy(values);
    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Minimum and maximum of a slice.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
        (lo.min(x), hi.max(x))
    }))
}

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Calculate the sample standard deviation (n-1 denominator).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn median_calculates_correctly() {
        assert_relative_eq!(median(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap(), 3.0);
        assert_relative_eq!(median(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5);
        assert_relative_eq!(median(&[5.0, 1.0, 3.0, 2.0, 4.0]).unwrap(), 3.0);
        assert!(median(&[]).is_none());
    }

    #[test]
    fn median_midpoint_does_not_overflow() {
        assert_eq!(median(&[f64::MAX, f64::MAX]), Some(f64::MAX));
        assert_eq!(median(&[-1e308, 1e308]), Some(0.0));
        assert_eq!(median(&[1e308, 1e308, -1e308, 1e308]), Some(1e308));
    }

    #[test]
    fn mad_of_symmetric_data() {
        // |x - 3| = [2, 1, 0, 1, 2] -> median 1
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(median_absolute_deviation(&values, 3.0).unwrap(), 1.0);
        assert_relative_eq!(robust_scale(&values, 3.0).unwrap(), MAD_SCALE);
    }

    #[test]
    fn mad_ignores_single_outlier() {
        let values = [10.0, 10.0, 10.0, 10.0, 1000.0];
        assert_relative_eq!(median_absolute_deviation(&values, 10.0).unwrap(), 0.0);
    }

    #[test]
    fn percentile_interpolates_linearly() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(percentile(&values, 0.0).unwrap(), 1.0);
        assert_relative_eq!(percentile(&values, 50.0).unwrap(), 3.0);
        assert_relative_eq!(percentile(&values, 100.0).unwrap(), 5.0);
        // rank = 0.9 * 4 = 3.6 -> 4 + 0.6
        assert_relative_eq!(percentile(&values, 90.0).unwrap(), 4.6, epsilon = 1e-12);
        assert!(percentile(&[], 50.0).is_none());
    }

    #[test]
    fn percentile_is_order_independent() {
        let a = percentile(&[5.0, 3.0, 1.0, 4.0, 2.0], 25.0).unwrap();
        let b = percentile(&[1.0, 2.0, 3.0, 4.0, 5.0], 25.0).unwrap();
        assert_relative_eq!(a, b);
    }

    #[test]
    fn min_max_and_moments() {
        assert_eq!(min_max(&[3.0, -1.0, 7.0]), Some((-1.0, 7.0)));
        assert!(min_max(&[]).is_none());
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0]).unwrap(), 2.0);
        assert_relative_eq!(
            std_dev(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap(),
            2.5_f64.sqrt(),
            epsilon = 1e-10
        );
        assert!(std_dev(&[1.0]).is_none());
    }
}
