//! Per-sample scoring strategies.

use std::fmt;

use tracing::debug;

use super::config::ScoringMethod;
use crate::detection::{
    detect_outliers, BlankingResult, OutlierConfig, OutlierMethod, ThresholdOutlierDetector,
};
use crate::error::Result;

/// Produces a 0/1 flag per sample of a blanked series.
pub trait OutlierScorer: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Flags must be 0 at every gap index.
    fn flag(&self, blanked: &BlankingResult) -> Result<Vec<u32>>;
}

/// Type alias for boxed scorer trait objects.
pub type BoxedScorer = Box<dyn OutlierScorer>;

/// Percentile cutoff over the blanked series, gap positions never flagged.
#[derive(Debug, Clone, Copy)]
pub struct RobustFilterStrategy {
    detector: ThresholdOutlierDetector,
}

impl RobustFilterStrategy {
    /// Create a strategy flagging samples above the `threshold`-th percentile.
    pub fn new(threshold: f64) -> Self {
        Self {
            detector: ThresholdOutlierDetector::new(threshold),
        }
    }
}

impl OutlierScorer for RobustFilterStrategy {
    fn name(&self) -> &'static str {
        "RobustFilter"
    }

    fn flag(&self, blanked: &BlankingResult) -> Result<Vec<u32>> {
        self.detector.detect(&blanked.values, &blanked.gap_indices)
    }
}

/// Global z-score, modified z-score or IQR scoring of the blanked series.
#[derive(Debug, Clone, Copy)]
pub struct GlobalOutlierStrategy {
    config: OutlierConfig,
}

impl GlobalOutlierStrategy {
    /// Create a strategy from a global outlier configuration.
    pub fn new(config: OutlierConfig) -> Self {
        Self { config }
    }
}

impl OutlierScorer for GlobalOutlierStrategy {
    fn name(&self) -> &'static str {
        match self.config.method {
            OutlierMethod::IQR => "IQR",
            OutlierMethod::ZScore => "ZScore",
            OutlierMethod::ModifiedZScore => "ModifiedZScore",
        }
    }

    fn flag(&self, blanked: &BlankingResult) -> Result<Vec<u32>> {
        let result = detect_outliers(&blanked.values, &blanked.gap_indices, &self.config)?;
        debug!(
            method = self.name(),
            flagged = result.outlier_count(),
            "global outlier scoring complete"
        );
        Ok(result.flags())
    }
}

impl ScoringMethod {
    /// Build the scorer this method selects.
    pub fn scorer(&self, threshold: f64) -> BoxedScorer {
        match *self {
            ScoringMethod::RobustFilter => Box::new(RobustFilterStrategy::new(threshold)),
            ScoringMethod::ModifiedZScore { cutoff } => {
                Box::new(GlobalOutlierStrategy::new(OutlierConfig::modified_z_score(cutoff)))
            }
            ScoringMethod::ZScore { cutoff } => {
                Box::new(GlobalOutlierStrategy::new(OutlierConfig::z_score(cutoff)))
            }
            ScoringMethod::Iqr { multiplier } => {
                Box::new(GlobalOutlierStrategy::new(OutlierConfig::iqr(multiplier)))
            }
        }
    }
}
