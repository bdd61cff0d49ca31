//! Global outlier scoring over the non-gap population.
//!
//! Scores every sample against statistics of the whole series (gaps
//! excluded). Used by the non-default scoring strategies.

use serde::{Deserialize, Serialize};

use crate::error::{AnomalyError, Result, Stage};
use crate::utils::{mean, median, median_absolute_deviation, percentile, std_dev};

/// Method for global outlier scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    /// Distance outside the Tukey fences, in IQR units.
    IQR,
    /// Absolute z-score.
    ZScore,
    /// Modified z-score using the MAD.
    ModifiedZScore,
}

/// Configuration for global outlier scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierConfig {
    pub method: OutlierMethod,
    /// Score cutoff (IQR fence multiplier for [`OutlierMethod::IQR`]).
    pub threshold: f64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self::modified_z_score(3.5)
    }
}

impl OutlierConfig {
    /// IQR method: flag samples outside `[Q1 - m·IQR, Q3 + m·IQR]`.
    pub fn iqr(multiplier: f64) -> Self {
        Self {
            method: OutlierMethod::IQR,
            threshold: multiplier,
        }
    }

    /// Z-score method: flag samples with `|x - mean| / sd` above `threshold`.
    pub fn z_score(threshold: f64) -> Self {
        Self {
            method: OutlierMethod::ZScore,
            threshold,
        }
    }

    /// Modified z-score method: `0.6745·|x - median| / MAD` above `threshold`.
    pub fn modified_z_score(threshold: f64) -> Self {
        Self {
            method: OutlierMethod::ModifiedZScore,
            threshold,
        }
    }
}

/// Result of global outlier scoring.
#[derive(Debug, Clone)]
pub struct OutlierResult {
    pub outlier_indices: Vec<usize>,
    /// Score per sample; 0 at gap positions.
    pub scores: Vec<f64>,
    pub threshold: f64,
    pub method: OutlierMethod,
}

impl OutlierResult {
    /// Number of flagged samples.
    pub fn outlier_count(&self) -> usize {
        self.outlier_indices.len()
    }

    /// Whether sample `index` was flagged.
    pub fn is_outlier(&self, index: usize) -> bool {
        self.outlier_indices.binary_search(&index).is_ok()
    }

    /// 0/1 flag per sample.
    pub fn flags(&self) -> Vec<u32> {
        let mut flags = vec![0; self.scores.len()];
        for &i in &self.outlier_indices {
            flags[i] = 1;
        }
        flags
    }
}

/// Score `values` against the statistics of the samples not listed in `gap_indices`.
pub fn detect_outliers(
    values: &[f64],
    gap_indices: &[usize],
    config: &OutlierConfig,
) -> Result<OutlierResult> {
    let n = values.len();
    let mut is_gap = vec![false; n];
    for &i in gap_indices {
        *is_gap
            .get_mut(i)
            .ok_or(AnomalyError::IndexOutOfBounds { index: i, size: n })? = true;
    }
    let population: Vec<f64> = values
        .iter()
        .zip(&is_gap)
        .filter(|(_, &gap)| !gap)
        .map(|(&v, _)| v)
        .collect();
    if population.is_empty() {
        return Err(AnomalyError::degenerate(
            Stage::ThresholdOutlier,
            "no samples left after removing gaps",
        ));
    }

    let score: Box<dyn Fn(f64) -> f64> = match config.method {
        OutlierMethod::IQR => iqr_score(&population, config.threshold),
        OutlierMethod::ZScore => z_score(&population),
        OutlierMethod::ModifiedZScore => modified_z_score(&population),
    };
    // IQR scores are distances past the fence, so anything positive is an outlier.
    let cutoff = match config.method {
        OutlierMethod::IQR => 0.0,
        _ => config.threshold,
    };

    let scores: Vec<f64> = values
        .iter()
        .zip(&is_gap)
        .map(|(&v, &gap)| if gap { 0.0 } else { score(v) })
        .collect();
    let outlier_indices = scores
        .iter()
        .enumerate()
        .filter(|(_, &s)| s > cutoff)
        .map(|(i, _)| i)
        .collect();

    Ok(OutlierResult {
        outlier_indices,
        scores,
        threshold: cutoff,
        method: config.method,
    })
}

fn iqr_score(population: &[f64], multiplier: f64) -> Box<dyn Fn(f64) -> f64> {
    let (Some(q1), Some(q3)) = (percentile(population, 25.0), percentile(population, 75.0)) else {
        return Box::new(|_| 0.0);
    };
    let iqr = (q3 - q1).max(1e-10);
    let lower = q1 - multiplier * iqr;
    let upper = q3 + multiplier * iqr;
    Box::new(move |x| {
        if x < lower {
            (lower - x) / iqr
        } else if x > upper {
            (x - upper) / iqr
        } else {
            0.0
        }
    })
}

fn z_score(population: &[f64]) -> Box<dyn Fn(f64) -> f64> {
    match (mean(population), std_dev(population)) {
        (Some(m), Some(sd)) if sd > 1e-10 => Box::new(move |x| ((x - m) / sd).abs()),
        _ => Box::new(|_| 0.0),
    }
}

fn modified_z_score(population: &[f64]) -> Box<dyn Fn(f64) -> f64> {
    // 0.6745 is the 0.75 quantile of the standard normal
    let center = median(population);
    let mad = center.and_then(|c| median_absolute_deviation(population, c));
    match (center, mad) {
        (Some(c), Some(mad)) if mad / 0.6745 > 1e-10 => {
            let scaled = mad / 0.6745;
            Box::new(move |x| ((x - c) / scaled).abs())
        }
        _ => Box::new(|_| 0.0),
    }
}
