//! Utility functions shared by the detection stages.

pub mod stats;

pub use stats::{
    mean, median, median_absolute_deviation, min_max, percentile, robust_scale, std_dev,
    MAD_SCALE,
};
