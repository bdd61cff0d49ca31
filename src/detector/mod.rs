//! The anomaly detector.
//!
//! Runs gap blanking, the robust local filter, per-sample scoring and
//! mean-shift detection, then merges the flags into a severity per sample.
//!
//! # Example
//!
//! ```
//! use methane_anomaly::detector::{AnomalyDetector, DetectorConfig};
//!
//! let mut readings: Vec<f64> = (0..120).map(|i| 1850.0 + (i as f64 * 0.2).sin()).collect();
//! readings[30] = 0.0; // no retrieval
//! readings[80] = 1990.0;
//!
//! let detector = AnomalyDetector::new(DetectorConfig::new(5, 99.0)).unwrap();
//! let report = detector.detect(&readings).unwrap();
//!
//! assert_eq!(report.severity.len(), readings.len());
//! assert!(report.is_anomalous(80));
//! assert_eq!(report.gap_indices, vec![30]);
//! ```

pub mod config;
pub mod report;
pub mod strategy;

pub use config::{DetectorConfig, ScoringMethod};
pub use report::{AnomalyReport, LocatedAnomaly};
pub use strategy::{BoxedScorer, GlobalOutlierStrategy, OutlierScorer, RobustFilterStrategy};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::changepoint::MeanShiftDetector;
use crate::core::Series;
use crate::detection::{aggregate, GapBlanker, RobustLocalFilter};
use crate::error::{AnomalyError, Result, Stage};

/// Detects anomalous samples in a univariate series.
///
/// Holds only its immutable configuration; every call works on fresh data,
/// so one detector can serve many threads.
#[derive(Debug)]
pub struct AnomalyDetector {
    config: DetectorConfig,
    scorer: BoxedScorer,
    mean_shift: MeanShiftDetector,
}

impl AnomalyDetector {
    /// Validate `config` and build a detector.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scorer: config.method.scorer(config.threshold),
            mean_shift: MeanShiftDetector::new(config.window_size, &config.mean_shift)?,
            config,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect anomalies in raw readings, marking missing samples with the
    /// configured [`MissingMarker`](crate::core::MissingMarker).
    pub fn detect(&self, values: &[f64]) -> Result<AnomalyReport> {
        self.detect_series(&Series::from_values(values.to_vec(), self.config.missing))
    }

    /// Detect anomalies in a series with an explicit validity mask.
    pub fn detect_series(&self, series: &Series) -> Result<AnomalyReport> {
        self.run(series).inspect_err(|err| {
            if err.is_recoverable() {
                warn!(len = series.len(), error = %err, "series skipped");
            }
        })
    }

    /// Detect anomalies in independent series in parallel.
    ///
    /// Results are returned in input order.
    pub fn detect_batch(&self, batch: &[Series]) -> Vec<Result<AnomalyReport>> {
        batch.par_iter().map(|series| self.detect_series(series)).collect()
    }

    fn run(&self, series: &Series) -> Result<AnomalyReport> {
        let n = series.len();
        let window = self.config.window_size;
        if n < self.config.min_series_len() {
            return Err(AnomalyError::degenerate(
                Stage::Input,
                format!(
                    "series of length {} is shorter than twice the window size {}",
                    n, window
                ),
            ));
        }
        if series.is_all_missing() {
            return Err(AnomalyError::degenerate(
                Stage::Input,
                format!("all {} samples are missing", n),
            ));
        }

        let blanked = GapBlanker::new(window).blank(series)?;
        let filtered = RobustLocalFilter::new(window, self.config.threshold)
            .apply(&blanked.values, &blanked.mask)?;
        let outlier_flags = self.scorer.flag(&blanked)?;
        let shifts = self.mean_shift.detect(&filtered.smoothed)?;
        let merged = aggregate(&outlier_flags, &shifts.shift_indices)?;

        debug!(
            len = n,
            method = self.scorer.name(),
            outliers = outlier_flags.iter().filter(|&&f| f > 0).count(),
            shifts = shifts.shift_indices.len(),
            anomalies = merged.anomaly_indices.len(),
            "detection complete"
        );

        Ok(AnomalyReport {
            severity: merged.severity,
            anomaly_indices: merged.anomaly_indices,
            edge_response: shifts.edge_response,
            blanked: blanked.values,
            blank_mask: blanked.mask,
            gap_indices: blanked.gap_indices,
            smoothed: filtered.smoothed,
            detrended: filtered.detrended,
            upper_bound: filtered.upper,
            lower_bound: filtered.lower,
            outlier_flags,
            shift_indices: shifts.shift_indices,
            method: self.config.method,
        })
    }
}
