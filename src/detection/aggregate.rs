//! Merge per-method flags into a severity score per sample.

use tracing::debug;

use crate::error::{AnomalyError, Result};

/// Severity per sample and the indices where it is positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    /// Number of methods that flagged each sample.
    pub severity: Vec<u32>,
    /// Ascending indices with `severity > 0`.
    pub anomaly_indices: Vec<usize>,
}

/// `severity[i] = flags[i] + (1 if i is a shift index)`.
///
/// Repeated shift indices count once.
///
/// # Example
/// ```
/// use methane_anomaly::detection::aggregate;
///
/// let agg = aggregate(&[0, 1, 0], &[2]).unwrap();
/// assert_eq!(agg.severity, vec![0, 1, 1]);
/// assert_eq!(agg.anomaly_indices, vec![1, 2]);
/// ```
pub fn aggregate(flags: &[u32], shift_indices: &[usize]) -> Result<Aggregate> {
    let n = flags.len();
    let mut shifted = vec![0u32; n];
    for &i in shift_indices {
        *shifted
            .get_mut(i)
            .ok_or(AnomalyError::IndexOutOfBounds { index: i, size: n })? = 1;
    }

    let severity: Vec<u32> = flags.iter().zip(&shifted).map(|(h, m)| h + m).collect();
    let anomaly_indices: Vec<usize> = severity
        .iter()
        .enumerate()
        .filter(|(_, &s)| s > 0)
        .map(|(i, _)| i)
        .collect();

    debug!(len = n, anomalies = anomaly_indices.len(), "aggregation complete");
    Ok(Aggregate {
        severity,
        anomaly_indices,
    })
}
