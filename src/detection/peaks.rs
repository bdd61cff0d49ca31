//! Derivative-based peak picking with non-maximum suppression.
//!
//! A sample is a peak when the first difference changes sign from positive to
//! negative across it and the sample exceeds a threshold given as a fraction
//! of the signal range. Flat stretches take the slope of their right-hand
//! neighbour so a plateau's leading edge is reported.

use std::cmp::Ordering;

use tracing::trace;

use crate::error::{AnomalyError, Result, Stage};
use crate::utils::min_max;

/// Default relative threshold.
pub const DEFAULT_PEAK_THRESHOLD: f64 = 0.05;
/// Default minimum index separation.
pub const DEFAULT_MIN_DISTANCE: usize = 1;

/// Finds local maxima in a 1-D signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakFinder {
    threshold: f64,
    min_distance: usize,
}

impl Default for PeakFinder {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_PEAK_THRESHOLD,
            min_distance: DEFAULT_MIN_DISTANCE,
        }
    }
}

impl PeakFinder {
    /// `threshold` is a fraction of `max - min` in `[0, 1]`.
    pub fn new(threshold: f64, min_distance: usize) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AnomalyError::InvalidConfiguration(format!(
                "peak threshold must be in [0, 1], got {}",
                threshold
            )));
        }
        Ok(Self {
            threshold,
            min_distance,
        })
    }

    /// Relative threshold in `[0, 1]`.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Minimum separation between surviving peaks.
    pub fn min_distance(&self) -> usize {
        self.min_distance
    }

    /// Ascending indices of the peaks of `signal`.
    ///
    /// # Example
    /// ```
    /// use methane_anomaly::detection::PeakFinder;
    ///
    /// let peaks = PeakFinder::default().find(&[0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0]).unwrap();
    /// assert_eq!(peaks, vec![3]);
    /// ```
    pub fn find(&self, signal: &[f64]) -> Result<Vec<usize>> {
        let n = signal.len();
        if n < 3 {
            return Ok(Vec::new());
        }
        if let Some(i) = signal.iter().position(|v| !v.is_finite()) {
            return Err(AnomalyError::degenerate(
                Stage::PeakFinding,
                format!("non-finite sample at index {}", i),
            ));
        }

        let (lo, hi) = min_max(signal)
            .ok_or_else(|| AnomalyError::degenerate(Stage::PeakFinding, "signal is empty"))?;
        let abs_threshold = self.threshold * (hi - lo) + lo;

        let mut ds: Vec<f64> = signal.windows(2).map(|w| w[1] - w[0]).collect();
        let max_iterations = ds.len() + 1;
        if !resolve_plateaus(&mut ds, max_iterations)? {
            return Ok(Vec::new());
        }

        let peaks: Vec<usize> = (1..n - 1)
            .filter(|&i| ds[i] < 0.0 && ds[i - 1] > 0.0 && signal[i] > abs_threshold)
            .collect();

        if peaks.len() > 1 && self.min_distance > 1 {
            Ok(suppress_non_maxima(signal, &peaks, self.min_distance))
        } else {
            Ok(peaks)
        }
    }
}

/// Replace zero differences so every flat stretch inherits a slope.
///
/// Returns `false` when the signal is globally flat, and
/// [`AnomalyError::PeakFindingFailure`] when zeros remain after
/// `max_iterations` propagation passes.
fn resolve_plateaus(ds: &mut [f64], max_iterations: usize) -> Result<bool> {
    let Some(last_slope) = ds.iter().rposition(|&d| d != 0.0) else {
        return Ok(false);
    };
    // A trailing flat run has nothing to its right; it continues the last slope.
    let tail = ds[last_slope];
    ds[last_slope + 1..].fill(tail);

    let mut iterations = 0;
    while ds.contains(&0.0) {
        if iterations >= max_iterations {
            return Err(AnomalyError::PeakFindingFailure { iterations });
        }
        let right: Vec<f64> = ds.iter().skip(1).copied().chain([0.0]).collect();
        for (d, r) in ds.iter_mut().zip(right) {
            if *d == 0.0 {
                *d = r;
            }
        }
        iterations += 1;
    }

    trace!(iterations, "plateaus resolved");
    Ok(true)
}

/// Keep the highest peak in every `min_distance` neighbourhood.
fn suppress_non_maxima(signal: &[f64], peaks: &[usize], min_distance: usize) -> Vec<usize> {
    let n = signal.len();
    let mut by_height = peaks.to_vec();
    by_height.sort_by(|&a, &b| {
        signal[b]
            .partial_cmp(&signal[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut removed = vec![true; n];
    for &p in peaks {
        removed[p] = false;
    }
    for &p in &by_height {
        if !removed[p] {
            let lo = p.saturating_sub(min_distance);
            let hi = p.saturating_add(min_distance).min(n - 1);
            removed[lo..=hi].fill(true);
            removed[p] = false;
        }
    }

    (0..n).filter(|&i| !removed[i]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_peak() {
        let signal = [0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0];
        let peaks = PeakFinder::new(0.05, 1).unwrap().find(&signal).unwrap();
        assert_eq!(peaks, vec![3]);
    }

    #[test]
    fn non_maximum_suppression_keeps_highest() {
        let signal = [0.0, 1.0, 5.0, 1.0, 3.0, 1.0, 0.0];
        assert_eq!(PeakFinder::default().find(&signal).unwrap(), vec![2, 4]);

        let peaks = PeakFinder::new(0.05, 3).unwrap().find(&signal).unwrap();
        assert_eq!(peaks, vec![2]);
    }

    #[test]
    fn distant_peaks_survive_suppression() {
        let mut signal = vec![0.0; 30];
        signal[5] = 4.0;
        signal[20] = 2.0;
        let peaks = PeakFinder::new(0.05, 5).unwrap().find(&signal).unwrap();
        assert_eq!(peaks, vec![5, 20]);
    }

    #[test]
    fn threshold_filters_small_peaks() {
        let signal = [0.0, 10.0, 0.0, 1.0, 0.0];
        assert_eq!(PeakFinder::new(0.5, 1).unwrap().find(&signal).unwrap(), vec![1]);
        assert_eq!(PeakFinder::new(0.05, 1).unwrap().find(&signal).unwrap(), vec![1, 3]);
    }

    #[test]
    fn plateau_reports_leading_edge() {
        let signal = [0.0, 1.0, 1.0, 1.0, 0.0];
        assert_eq!(PeakFinder::default().find(&signal).unwrap(), vec![1]);
    }

    #[test]
    fn trailing_plateau_terminates() {
        let signal = [0.0, 2.0, 1.0, 1.0, 1.0];
        assert_eq!(PeakFinder::default().find(&signal).unwrap(), vec![1]);
    }

    #[test]
    fn flat_signal_has_no_peaks() {
        assert!(PeakFinder::default().find(&[3.0; 50]).unwrap().is_empty());
    }

    #[test]
    fn monotonic_signal_has_no_peaks() {
        let ramp: Vec<f64> = (0..20).map(f64::from).collect();
        assert!(PeakFinder::default().find(&ramp).unwrap().is_empty());
    }

    #[test]
    fn short_signals() {
        assert!(PeakFinder::default().find(&[]).unwrap().is_empty());
        assert!(PeakFinder::default().find(&[1.0, 2.0]).unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_threshold_and_nan() {
        assert!(PeakFinder::new(1.5, 1).is_err());
        assert!(PeakFinder::new(-0.1, 1).is_err());
        let err = PeakFinder::default().find(&[0.0, f64::NAN, 0.0]).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::PeakFinding));
    }

    #[test]
    fn plateau_resolution_is_bounded() {
        let mut ds = vec![0.0, 0.0, 1.0, 0.0, 0.0, -1.0, 0.0];
        assert!(resolve_plateaus(&mut ds, 8).unwrap());
        assert_eq!(ds, vec![1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0]);

        let mut flat = vec![0.0; 5];
        assert!(!resolve_plateaus(&mut flat, 6).unwrap());
    }

    #[test]
    fn plateau_resolution_fails_past_iteration_cap() {
        // a run of two zeros needs two passes
        let mut ds = vec![1.0, 0.0, 0.0, -1.0];
        let err = resolve_plateaus(&mut ds, 1).unwrap_err();
        assert_eq!(err, AnomalyError::PeakFindingFailure { iterations: 1 });
        assert_eq!(err.stage(), Some(Stage::PeakFinding));
        assert!(!err.is_recoverable());

        let mut ds = vec![1.0, 0.0, 0.0, -1.0];
        assert!(resolve_plateaus(&mut ds, 2).unwrap());
        assert_eq!(ds, vec![1.0, -1.0, -1.0, -1.0]);
    }
}
