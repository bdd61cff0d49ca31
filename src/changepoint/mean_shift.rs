//! Mean-shift detection by step-edge convolution.
//!
//! The smoothed series is convolved with a difference-of-box kernel; the
//! magnitude of the response peaks where the local level steps up or down.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::detection::peaks::{PeakFinder, DEFAULT_MIN_DISTANCE, DEFAULT_PEAK_THRESHOLD};
use crate::error::{AnomalyError, Result, Stage};
use crate::transform::{convolve_same, step_kernel};

/// Configuration for mean-shift detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeanShiftConfig {
    /// Kernel half-width as a fraction of the series length (capped by the window size).
    pub kernel_fraction: f64,
    /// Relative peak threshold on the edge response.
    pub peak_threshold: f64,
    /// Minimum separation between reported shifts.
    pub min_distance: usize,
}

impl Default for MeanShiftConfig {
    fn default() -> Self {
        Self {
            kernel_fraction: 0.03,
            peak_threshold: DEFAULT_PEAK_THRESHOLD,
            min_distance: DEFAULT_MIN_DISTANCE,
        }
    }
}

impl MeanShiftConfig {
    /// Set the kernel half-width as a fraction of the series length.
    pub fn kernel_fraction(mut self, fraction: f64) -> Self {
        self.kernel_fraction = fraction;
        self
    }

    /// Set the relative peak threshold in `[0, 1]`.
    pub fn peak_threshold(mut self, threshold: f64) -> Self {
        self.peak_threshold = threshold;
        self
    }

    /// Set the minimum separation between reported shifts.
    pub fn min_distance(mut self, min_distance: usize) -> Self {
        self.min_distance = min_distance;
        self
    }

    /// Check the kernel fraction and the peak-picking parameters.
    pub fn validate(&self) -> Result<()> {
        if !(self.kernel_fraction.is_finite() && self.kernel_fraction > 0.0) {
            return Err(AnomalyError::InvalidConfiguration(format!(
                "kernel fraction must be positive, got {}",
                self.kernel_fraction
            )));
        }
        PeakFinder::new(self.peak_threshold, self.min_distance).map(|_| ())
    }
}

/// Result of mean-shift detection.
#[derive(Debug, Clone, PartialEq)]
pub struct MeanShiftResult {
    /// Ascending indices of detected level shifts.
    pub shift_indices: Vec<usize>,
    /// `|s * K|`, same length as the input.
    pub edge_response: Vec<f64>,
    /// Half-width of the step kernel that was used.
    pub kernel_half_width: usize,
}

/// Detects level shifts in a smoothed series.
#[derive(Debug, Clone, Copy)]
pub struct MeanShiftDetector {
    window_size: usize,
    kernel_fraction: f64,
    peaks: PeakFinder,
}

impl MeanShiftDetector {
    /// Create a detector whose kernel half-width never exceeds `window_size`.
    pub fn new(window_size: usize, config: &MeanShiftConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            window_size,
            kernel_fraction: config.kernel_fraction,
            peaks: PeakFinder::new(config.peak_threshold, config.min_distance)?,
        })
    }

    /// `min(round(fraction × len), window_size)`, at least 1.
    ///
    /// Rounding is half-to-even.
    pub fn kernel_half_width(&self, len: usize) -> usize {
        let scaled = (self.kernel_fraction * len as f64).round_ties_even() as usize;
        scaled.min(self.window_size).max(1)
    }

    /// Locate level shifts in a smoothed series.
    ///
    /// Returns the edge response with the input length and the ascending
    /// shift indices. The final index is never reported.
    pub fn detect(&self, smoothed: &[f64]) -> Result<MeanShiftResult> {
        let n = smoothed.len();
        if n < 2 {
            return Err(AnomalyError::degenerate(
                Stage::MeanShift,
                format!("need at least 2 samples, got {}", n),
            ));
        }
        if let Some(i) = smoothed.iter().position(|v| !v.is_finite()) {
            return Err(AnomalyError::degenerate(
                Stage::MeanShift,
                format!("non-finite sample at index {}", i),
            ));
        }

        let half_width = self.kernel_half_width(n);
        let mut response: Vec<f64> = convolve_same(smoothed, &step_kernel(half_width))
            .into_iter()
            .map(f64::abs)
            .collect();
        response.truncate(n);

        // The trailing zero lets a shift in the last samples register as a
        // peak; a hit on the final index itself is that sentinel and is dropped.
        let mut padded = response.clone();
        padded.push(0.0);
        let mut shift_indices = self.peaks.find(&padded)?;
        shift_indices.retain(|&i| i != n - 1);

        debug!(
            len = n,
            kernel_half_width = half_width,
            shifts = shift_indices.len(),
            "mean shift detection complete"
        );

        Ok(MeanShiftResult {
            shift_indices,
            edge_response: response,
            kernel_half_width: half_width,
        })
    }
}
