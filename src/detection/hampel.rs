//! Hampel-style robust local filter.
//!
//! For every sample the filter takes the median and the MAD-based scale of
//! the window `{t : |t - i| <= window_size}`. The running median is the
//! smoothed series and its absolute distance to the input is the detrended
//! series. Inside blanked regions the scale is pinned to 1.

use tracing::debug;

use crate::error::{AnomalyError, Result, Stage};
use crate::transform::rolling_apply_symmetric;
use crate::utils::{median, robust_scale};

/// Output of the robust local filter.
#[derive(Debug, Clone, PartialEq)]
pub struct HampelOutput {
    /// Running median.
    pub smoothed: Vec<f64>,
    /// `|smoothed - y|`.
    pub detrended: Vec<f64>,
    /// Local scale, `1.4826 × MAD`, or 1 inside blanked regions.
    pub scale: Vec<f64>,
    /// `median + threshold × 100 × scale`.
    pub upper: Vec<f64>,
    /// `median - threshold × 100 × scale`.
    pub lower: Vec<f64>,
}

impl HampelOutput {
    pub fn len(&self) -> usize {
        self.smoothed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.smoothed.is_empty()
    }

    /// Indices whose value lies outside `[lower, upper]`.
    pub fn out_of_bounds(&self, values: &[f64]) -> Vec<usize> {
        values
            .iter()
            .zip(self.lower.iter().zip(&self.upper))
            .enumerate()
            .filter(|(_, (&y, (&lo, &hi)))| y < lo || y > hi)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Sliding-window median/MAD filter.
#[derive(Debug, Clone, Copy)]
pub struct RobustLocalFilter {
    window_size: usize,
    threshold: f64,
}

impl RobustLocalFilter {
    /// Create a filter over windows of `2 * window_size + 1` samples.
    pub fn new(window_size: usize, threshold: f64) -> Self {
        Self {
            window_size,
            threshold,
        }
    }

    /// Filter `values`, pinning the scale to 1 wherever `blank_mask` is set.
    pub fn apply(&self, values: &[f64], blank_mask: &[bool]) -> Result<HampelOutput> {
        let n = values.len();
        if blank_mask.len() != n {
            return Err(AnomalyError::DimensionMismatch {
                expected: n,
                got: blank_mask.len(),
            });
        }
        if n == 0 {
            return Err(AnomalyError::degenerate(Stage::RobustFilter, "series is empty"));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(AnomalyError::degenerate(
                Stage::RobustFilter,
                format!("non-finite sample at index {}", i),
            ));
        }

        let windows = rolling_apply_symmetric(
            values,
            self.window_size,
            |i, window| -> Result<(f64, f64)> {
                let empty = || {
                    AnomalyError::degenerate(Stage::RobustFilter, format!("empty window at {}", i))
                };
                let center = median(window).ok_or_else(empty)?;
                let s = if blank_mask[i] {
                    1.0
                } else {
                    robust_scale(window, center).ok_or_else(empty)?
                };
                Ok((center, s))
            },
        );
        let (smoothed, scale): (Vec<f64>, Vec<f64>) =
            windows.into_iter().collect::<Result<Vec<_>>>()?.into_iter().unzip();

        let detrended = smoothed
            .iter()
            .zip(values)
            .map(|(m, y)| (m - y).abs())
            .collect();
        let width = self.threshold * 100.0;
        let upper = smoothed.iter().zip(&scale).map(|(m, s)| m + width * s).collect();
        let lower = smoothed.iter().zip(&scale).map(|(m, s)| m - width * s).collect();

        debug!(
            len = n,
            window = self.window_size,
            blanked = blank_mask.iter().filter(|&&b| b).count(),
            "robust filter complete"
        );

        Ok(HampelOutput {
            smoothed,
            detrended,
            scale,
            upper,
            lower,
        })
    }
}
