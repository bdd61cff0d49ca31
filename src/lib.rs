//! # methane-anomaly
//!
//! Robust anomaly detection for gap-ridden satellite methane time series.
//!
//! A series of column-averaged methane readings is gap-blanked, smoothed
//! with a Hampel-style median/MAD filter, scored against a global percentile
//! and scanned for level shifts with a step-edge kernel. The per-method flags
//! are merged into a severity per sample.
//!
//! # Example
//!
//! ```
//! use methane_anomaly::prelude::*;
//!
//! let mut readings = vec![1850.0; 60];
//! readings[10] = 0.0; // missing retrieval
//! readings[40] = 1950.0;
//!
//! let detector = AnomalyDetector::new(DetectorConfig::new(4, 95.0)).unwrap();
//! let report = detector.detect(&readings).unwrap();
//!
//! assert_eq!(report.edge_response.len(), readings.len());
//! assert!(report.anomaly_indices.contains(&40));
//! ```

#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::needless_range_loop)]

pub mod changepoint;
pub mod core;
pub mod detection;
pub mod detector;
pub mod error;
pub mod transform;
pub mod utils;

pub use error::{AnomalyError, Result, Stage};

pub mod prelude {
    pub use crate::core::{BoundingBox, MissingMarker, Series};
    pub use crate::detector::{
        AnomalyDetector, AnomalyReport, DetectorConfig, LocatedAnomaly, ScoringMethod,
    };
    pub use crate::error::{AnomalyError, Result, Stage};
}
