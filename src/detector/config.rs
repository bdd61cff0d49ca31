//! Detector configuration.

use serde::{Deserialize, Serialize};

use crate::changepoint::MeanShiftConfig;
use crate::core::MissingMarker;
use crate::error::{AnomalyError, Result};

/// Strategy used to flag individual samples.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ScoringMethod {
    /// Hampel filter followed by a percentile cutoff on the non-gap samples.
    #[default]
    RobustFilter,
    /// Global modified z-score (MAD based) above `cutoff`.
    ModifiedZScore { cutoff: f64 },
    /// Global z-score above `cutoff`.
    ZScore { cutoff: f64 },
    /// Outside the Tukey fences `[Q1 - m·IQR, Q3 + m·IQR]`.
    Iqr { multiplier: f64 },
}

impl ScoringMethod {
    /// Display name of the scoring strategy.
    pub fn name(&self) -> &'static str {
        match self {
            ScoringMethod::RobustFilter => "RobustFilter",
            ScoringMethod::ModifiedZScore { .. } => "ModifiedZScore",
            ScoringMethod::ZScore { .. } => "ZScore",
            ScoringMethod::Iqr { .. } => "IQR",
        }
    }

    /// Reject non-finite or non-positive method parameters.
    pub fn validate(&self) -> Result<()> {
        let (what, value) = match *self {
            ScoringMethod::RobustFilter => return Ok(()),
            ScoringMethod::ModifiedZScore { cutoff } | ScoringMethod::ZScore { cutoff } => {
                ("cutoff", cutoff)
            }
            ScoringMethod::Iqr { multiplier } => ("multiplier", multiplier),
        };
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(AnomalyError::InvalidConfiguration(format!(
                "{} {} must be positive, got {}",
                self.name(),
                what,
                value
            )))
        }
    }
}

/// Immutable hyperparameters of one detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Half-width of the robust filter window; gaps are masked `window_size / 2` around.
    pub window_size: usize,
    /// Percentile cutoff in `(0, 100]`, also the Hampel bound multiplier.
    pub threshold: f64,
    pub method: ScoringMethod,
    pub missing: MissingMarker,
    pub mean_shift: MeanShiftConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            threshold: 95.0,
            method: ScoringMethod::default(),
            missing: MissingMarker::default(),
            mean_shift: MeanShiftConfig::default(),
        }
    }
}

impl DetectorConfig {
    /// Configuration with the given window size and threshold, defaults elsewhere.
    pub fn new(window_size: usize, threshold: f64) -> Self {
        Self {
            window_size,
            threshold,
            ..Default::default()
        }
    }

    /// Set the robust filter half-width.
    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the percentile threshold.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the per-sample scoring strategy.
    pub fn method(mut self, method: ScoringMethod) -> Self {
        self.method = method;
        self
    }

    /// Set how missing samples are recognised in raw readings.
    pub fn missing(mut self, missing: MissingMarker) -> Self {
        self.missing = missing;
        self
    }

    /// Set the mean-shift parameters.
    pub fn mean_shift(mut self, mean_shift: MeanShiftConfig) -> Self {
        self.mean_shift = mean_shift;
        self
    }

    /// Shortest series the robust filter can score.
    pub fn min_series_len(&self) -> usize {
        self.window_size.saturating_mul(2)
    }

    /// Check every parameter, returning [`AnomalyError::InvalidConfiguration`] on the first bad one.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(AnomalyError::InvalidConfiguration(
                "window size must be at least 1".to_string(),
            ));
        }
        if !(self.threshold.is_finite() && self.threshold > 0.0 && self.threshold <= 100.0) {
            return Err(AnomalyError::InvalidConfiguration(format!(
                "threshold must be a percentile in (0, 100], got {}",
                self.threshold
            )));
        }
        self.method.validate()?;
        self.mean_shift.validate()
    }
}
