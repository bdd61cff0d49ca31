//! Gap blanking: impute runs of missing samples and mask their neighbourhood.
//!
//! Each maximal run of missing samples is filled with the median of its valid
//! boundary neighbours, and a blank mask is raised over the run widened by
//! half the window size on each side so later stages do not score imputed data.

use tracing::debug;

use crate::core::Series;
use crate::error::{AnomalyError, Result, Stage};
use crate::utils::median;

/// Inclusive index range of consecutive missing samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapRun {
    pub start: usize,
    pub end: usize,
}

// A run always holds at least one sample.
#[allow(clippy::len_without_is_empty)]
impl GapRun {
    /// Number of missing samples in the run.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Output of the gap blanker.
#[derive(Debug, Clone, PartialEq)]
pub struct BlankingResult {
    /// Copy of the input with every gap imputed.
    pub values: Vec<f64>,
    /// Ascending indices of the missing samples.
    pub gap_indices: Vec<usize>,
    /// Maximal runs of missing samples.
    pub runs: Vec<GapRun>,
    /// True where the sample lies in or next to an imputed region.
    pub mask: Vec<bool>,
}

impl BlankingResult {
    /// Whether `index` was missing in the input.
    pub fn is_gap(&self, index: usize) -> bool {
        self.gap_indices.binary_search(&index).is_ok()
    }

    /// Number of masked samples.
    pub fn blanked_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }
}

/// Split ascending indices into maximal runs of adjacent positions.
pub fn contiguous_runs(indices: &[usize]) -> Vec<GapRun> {
    let mut runs: Vec<GapRun> = Vec::new();
    for &idx in indices {
        match runs.last_mut() {
            Some(run) if run.end + 1 == idx => run.end = idx,
            _ => runs.push(GapRun { start: idx, end: idx }),
        }
    }
    runs
}

/// Locates gap runs, imputes them and builds the blank mask.
#[derive(Debug, Clone, Copy)]
pub struct GapBlanker {
    window_size: usize,
}

impl GapBlanker {
    /// Create a blanker masking `window_size / 2` samples around each gap run.
    pub fn new(window_size: usize) -> Self {
        Self { window_size }
    }

    /// Blank the gaps of `series`. The input is never modified.
    pub fn blank(&self, series: &Series) -> Result<BlankingResult> {
        let n = series.len();
        if n == 0 {
            return Err(AnomalyError::degenerate(Stage::GapBlanking, "series is empty"));
        }
        if series.is_all_missing() {
            return Err(AnomalyError::degenerate(
                Stage::GapBlanking,
                format!("all {} samples are missing", n),
            ));
        }

        let gap_indices = series.missing_indices();
        let runs = contiguous_runs(&gap_indices);
        let mut values = series.values().to_vec();
        let mut mask = vec![false; n];
        let half = self.window_size / 2;

        // At least one valid and one missing sample exist here, so n >= 2.
        for run in &runs {
            let start = run.start.max(1);
            let end = run.end.min(n - 2);
            let neighbours: Vec<f64> = [start - 1, end + 1]
                .into_iter()
                .filter(|&i| series.is_valid(i))
                .map(|i| series.values()[i])
                .collect();
            let fill = median(&neighbours).ok_or_else(|| {
                AnomalyError::degenerate(
                    Stage::GapBlanking,
                    format!("gap {}..={} has no valid neighbour", run.start, run.end),
                )
            })?;

            values[run.start..=run.end].fill(fill);

            let lo = run.start.saturating_sub(half);
            let hi = run.end.saturating_add(half).min(n - 1);
            mask[lo..=hi].fill(true);
        }

        debug!(
            len = n,
            gaps = gap_indices.len(),
            runs = runs.len(),
            "gap blanking complete"
        );

        Ok(BlankingResult {
            values,
            gap_indices,
            runs,
            mask,
        })
    }
}
