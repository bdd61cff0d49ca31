//! Detection results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::ScoringMethod;
use crate::core::Series;
use crate::error::{AnomalyError, Result};

/// Output of one detection run. Every per-sample vector has the input length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Number of methods that flagged each sample (0 = normal).
    pub severity: Vec<u32>,
    /// Ascending indices with positive severity.
    pub anomaly_indices: Vec<usize>,
    /// Mean-shift edge response magnitude.
    pub edge_response: Vec<f64>,
    /// Input with gaps imputed.
    pub blanked: Vec<f64>,
    pub blank_mask: Vec<bool>,
    pub gap_indices: Vec<usize>,
    /// Running median from the robust filter.
    pub smoothed: Vec<f64>,
    /// `|smoothed - blanked|`.
    pub detrended: Vec<f64>,
    pub upper_bound: Vec<f64>,
    pub lower_bound: Vec<f64>,
    /// Flags from the scoring strategy.
    pub outlier_flags: Vec<u32>,
    /// Level shifts from the mean-shift detector.
    pub shift_indices: Vec<usize>,
    pub method: ScoringMethod,
}

/// An anomaly joined with the series' auxiliary arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatedAnomaly {
    pub index: usize,
    pub severity: u32,
    /// Raw reading, `None` when the sample was missing.
    pub value: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl AnomalyReport {
    /// Number of scored samples.
    pub fn len(&self) -> usize {
        self.severity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.severity.is_empty()
    }

    /// Number of samples with positive severity.
    pub fn anomaly_count(&self) -> usize {
        self.anomaly_indices.len()
    }

    /// Whether `index` has positive severity. Out-of-range indices are not anomalous.
    pub fn is_anomalous(&self, index: usize) -> bool {
        self.severity.get(index).is_some_and(|&s| s > 0)
    }

    /// Highest severity in the report, 0 when empty.
    pub fn max_severity(&self) -> u32 {
        self.severity.iter().copied().max().unwrap_or(0)
    }

    /// Join anomalies with timestamps and coordinates of the scored series.
    pub fn locate(&self, series: &Series) -> Result<Vec<LocatedAnomaly>> {
        if series.len() != self.len() {
            return Err(AnomalyError::DimensionMismatch {
                expected: self.len(),
                got: series.len(),
            });
        }
        Ok(self
            .anomaly_indices
            .iter()
            .map(|&index| {
                let coordinates = series.coordinates(index);
                LocatedAnomaly {
                    index,
                    severity: self.severity[index],
                    value: series.is_valid(index).then(|| series.values()[index]),
                    timestamp: series.timestamp(index),
                    latitude: coordinates.map(|c| c.0),
                    longitude: coordinates.map(|c| c.1),
                }
            })
            .collect())
    }
}
