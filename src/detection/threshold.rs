//! Global percentile threshold outliers.
//!
//! The cutoff is the `threshold`-th percentile of the samples that were not
//! missing. Samples above it are flagged, except at gap positions where the
//! value is an imputation artefact.

use tracing::debug;

use crate::error::{AnomalyError, Result, Stage};
use crate::utils::percentile;

/// Flags samples above a global percentile.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdOutlierDetector {
    threshold: f64,
}

impl ThresholdOutlierDetector {
    /// `threshold` is a percentile in `(0, 100]`.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The percentile cutoff over `values` with `gap_indices` removed.
    pub fn cutoff(&self, values: &[f64], gap_indices: &[usize]) -> Result<f64> {
        let is_gap = gap_lookup(values.len(), gap_indices)?;
        let population: Vec<f64> = values
            .iter()
            .zip(&is_gap)
            .filter(|(_, &gap)| !gap)
            .map(|(&v, _)| v)
            .collect();
        percentile(&population, self.threshold).ok_or_else(|| {
            AnomalyError::degenerate(
                Stage::ThresholdOutlier,
                "no samples left after removing gaps",
            )
        })
    }

    /// 0/1 flag per sample.
    pub fn detect(&self, values: &[f64], gap_indices: &[usize]) -> Result<Vec<u32>> {
        let cutoff = self.cutoff(values, gap_indices)?;
        let is_gap = gap_lookup(values.len(), gap_indices)?;
        let flags: Vec<u32> = values
            .iter()
            .zip(&is_gap)
            .map(|(&v, &gap)| u32::from(v > cutoff && !gap))
            .collect();

        debug!(
            cutoff,
            flagged = flags.iter().filter(|&&f| f > 0).count(),
            "threshold outliers complete"
        );
        Ok(flags)
    }
}

fn gap_lookup(len: usize, gap_indices: &[usize]) -> Result<Vec<bool>> {
    let mut is_gap = vec![false; len];
    for &i in gap_indices {
        let slot = is_gap
            .get_mut(i)
            .ok_or(AnomalyError::IndexOutOfBounds { index: i, size: len })?;
        *slot = true;
    }
    Ok(is_gap)
}
