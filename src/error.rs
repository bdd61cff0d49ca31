//! Error types for the methane-anomaly library.

use std::fmt;

use thiserror::Error;

/// Result type alias for detection operations.
pub type Result<T> = std::result::Result<T, AnomalyError>;

/// Pipeline stage that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Input validation before any stage runs.
    Input,
    /// Gap location, imputation and masking.
    GapBlanking,
    /// Sliding-window median/MAD filter.
    RobustFilter,
    /// Percentile or global outlier scoring.
    ThresholdOutlier,
    /// Derivative-based peak picking.
    PeakFinding,
    /// Step-kernel edge detection.
    MeanShift,
    /// Severity aggregation.
    Aggregation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Input => "input",
            Stage::GapBlanking => "gap blanking",
            Stage::RobustFilter => "robust filter",
            Stage::ThresholdOutlier => "threshold outlier",
            Stage::PeakFinding => "peak finding",
            Stage::MeanShift => "mean shift",
            Stage::Aggregation => "aggregation",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while detecting anomalies.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnomalyError {
    /// A hyperparameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The series cannot be scored (too short, all missing, empty population).
    #[error("degenerate input in {stage} stage: {reason}")]
    DegenerateInput { stage: Stage, reason: String },

    /// Plateau resolution did not converge within its iteration cap.
    #[error("peak finding failed: plateau resolution did not converge after {iterations} iterations")]
    PeakFindingFailure { iterations: usize },

    /// Two arrays sharing an index space have different lengths.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamps attached to a series are out of order.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },
}

impl AnomalyError {
    pub(crate) fn degenerate(stage: Stage, reason: impl Into<String>) -> Self {
        AnomalyError::DegenerateInput {
            stage,
            reason: reason.into(),
        }
    }

    /// True when the error means "no result for this series" rather than a caller bug.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AnomalyError::DegenerateInput { .. })
    }

    /// The stage that failed, when known.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            AnomalyError::DegenerateInput { stage, .. } => Some(*stage),
            AnomalyError::PeakFindingFailure { .. } => Some(Stage::PeakFinding),
            AnomalyError::IndexOutOfBounds { .. } => Some(Stage::Aggregation),
            AnomalyError::InvalidConfiguration(_)
            | AnomalyError::DimensionMismatch { .. }
            | AnomalyError::TimestampError(_) => None,
        }
    }
}
