//! Detection stages of the anomaly pipeline.
//!
//! This module provides:
//! - Gap blanking (imputation and masking of missing runs)
//! - A Hampel-style robust local filter
//! - Percentile and global outlier scoring
//! - Peak picking and severity aggregation

pub mod aggregate;
pub mod blanking;
pub mod hampel;
pub mod outlier;
pub mod peaks;
pub mod threshold;

pub use aggregate::{aggregate, Aggregate};
pub use blanking::{contiguous_runs, BlankingResult, GapBlanker, GapRun};
pub use hampel::{HampelOutput, RobustLocalFilter};
pub use outlier::{detect_outliers, OutlierConfig, OutlierMethod, OutlierResult};
pub use peaks::PeakFinder;
pub use threshold::ThresholdOutlierDetector;
