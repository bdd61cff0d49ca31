//! Level-shift detection.
//!
//! # Example
//!
//! ```
//! use methane_anomaly::changepoint::{MeanShiftConfig, MeanShiftDetector};
//!
//! let mut series = vec![0.0; 100];
//! series[60..].iter_mut().for_each(|x| *x = 10.0);
//!
//! let detector = MeanShiftDetector::new(10, &MeanShiftConfig::default()).unwrap();
//! let result = detector.detect(&series).unwrap();
//!
//! assert_eq!(result.edge_response.len(), series.len());
//! assert!(result.shift_indices.iter().any(|&i| (58..=61).contains(&i)));
//! ```

pub mod mean_shift;

pub use mean_shift::{MeanShiftConfig, MeanShiftDetector, MeanShiftResult};
