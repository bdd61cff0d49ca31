//! Property-based tests for the detection pipeline.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated methane-like series.

use methane_anomaly::changepoint::{MeanShiftConfig, MeanShiftDetector};
use methane_anomaly::core::{MissingMarker, Series};
use methane_anomaly::detection::{GapBlanker, PeakFinder, ThresholdOutlierDetector};
use methane_anomaly::detector::{AnomalyDetector, DetectorConfig};
use proptest::prelude::*;

/// Strategy for readings without missing samples.
fn readings_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1700.0..2000.0_f64, min_len..max_len)
}

/// Strategy for readings where roughly one sample in `1 / gap_rate` is a 0 sentinel.
/// The first sample is always valid so the series is never entirely missing.
fn gappy_readings_strategy(
    min_len: usize,
    max_len: usize,
    gap_rate: f64,
) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(move |len| {
        (
            prop::collection::vec(1700.0..2000.0_f64, len),
            prop::collection::vec(prop::bool::weighted(gap_rate), len),
        )
            .prop_map(|(mut values, gaps)| {
                for (i, (v, gap)) in values.iter_mut().zip(gaps).enumerate() {
                    if gap && i > 0 {
                        *v = 0.0;
                    }
                }
                values
            })
    })
}

fn count_flags(flags: &[u32]) -> usize {
    flags.iter().filter(|&&f| f > 0).count()
}

// =============================================================================
// Property: gap blanking is the identity on complete series
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn complete_series_is_not_blanked(
        values in readings_strategy(2, 200),
        window in 1usize..20
    ) {
        let series = Series::from_values(values.clone(), MissingMarker::default());
        let result = GapBlanker::new(window).blank(&series).unwrap();
        prop_assert!(result.mask.iter().all(|&m| !m));
        prop_assert_eq!(result.values, values);
    }

    #[test]
    fn blanking_imputes_every_gap_and_masks_it(
        values in gappy_readings_strategy(2, 200, 0.2),
        window in 1usize..20
    ) {
        let series = Series::from_values(values.clone(), MissingMarker::default());
        let result = GapBlanker::new(window).blank(&series).unwrap();

        prop_assert_eq!(result.values.len(), values.len());
        prop_assert_eq!(result.mask.len(), values.len());
        for &i in &result.gap_indices {
            prop_assert!(result.mask[i]);
            prop_assert!(result.values[i] >= 1700.0 && result.values[i] <= 2000.0);
        }
        prop_assert_eq!(series.values(), values.as_slice());
    }
}

// =============================================================================
// Property: output lengths match the input and detection is repeatable
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn report_lengths_match_input(
        values in gappy_readings_strategy(40, 300, 0.1),
        window in 1usize..20
    ) {
        let detector = AnomalyDetector::new(DetectorConfig::new(window, 95.0)).unwrap();
        let report = detector.detect(&values).unwrap();

        prop_assert_eq!(report.severity.len(), values.len());
        prop_assert_eq!(report.edge_response.len(), values.len());
        prop_assert_eq!(report.smoothed.len(), values.len());
        prop_assert_eq!(report.blank_mask.len(), values.len());
    }

    #[test]
    fn detection_is_idempotent(
        values in gappy_readings_strategy(40, 200, 0.1),
        window in 1usize..10
    ) {
        let detector = AnomalyDetector::new(DetectorConfig::new(window, 90.0)).unwrap();
        let first = detector.detect(&values).unwrap();
        let second = detector.detect(&values).unwrap();

        prop_assert_eq!(&first.severity, &second.severity);
        prop_assert_eq!(&first.anomaly_indices, &second.anomaly_indices);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn severity_is_sum_of_flags_and_shifts(
        values in gappy_readings_strategy(40, 200, 0.05),
        window in 1usize..10
    ) {
        let detector = AnomalyDetector::new(DetectorConfig::new(window, 95.0)).unwrap();
        let report = detector.detect(&values).unwrap();

        for i in 0..values.len() {
            let shift = u32::from(report.shift_indices.contains(&i));
            prop_assert_eq!(report.severity[i], report.outlier_flags[i] + shift);
        }
        let expected: Vec<usize> = (0..values.len()).filter(|&i| report.severity[i] > 0).collect();
        prop_assert_eq!(report.anomaly_indices, expected);
        for &g in &report.gap_indices {
            prop_assert_eq!(report.outlier_flags[g], 0);
        }
    }
}

// =============================================================================
// Property: higher percentile never flags more samples
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn threshold_is_monotonic(
        values in readings_strategy(5, 200),
        low in 1.0..100.0_f64,
        delta in 0.0..50.0_f64
    ) {
        let high = (low + delta).min(100.0);
        let gaps: Vec<usize> = Vec::new();
        let at_low = ThresholdOutlierDetector::new(low).detect(&values, &gaps).unwrap();
        let at_high = ThresholdOutlierDetector::new(high).detect(&values, &gaps).unwrap();
        prop_assert!(count_flags(&at_high) <= count_flags(&at_low));
    }
}

// =============================================================================
// Property: peak picking and mean-shift invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn peaks_are_ascending_interior_and_separated(
        signal in prop::collection::vec(-50.0..50.0_f64, 3..150),
        min_distance in 1usize..8
    ) {
        let peaks = PeakFinder::new(0.05, min_distance).unwrap().find(&signal).unwrap();

        for pair in peaks.windows(2) {
            prop_assert!(pair[0] < pair[1]);
            if min_distance > 1 {
                prop_assert!(pair[1] - pair[0] > min_distance);
            }
        }
        for &p in &peaks {
            prop_assert!(p > 0 && p < signal.len() - 1);
        }
    }

    #[test]
    fn mean_shift_never_reports_last_index(
        signal in prop::collection::vec(-100.0..100.0_f64, 2..200),
        window in 1usize..15
    ) {
        let detector = MeanShiftDetector::new(window, &MeanShiftConfig::default()).unwrap();
        let result = detector.detect(&signal).unwrap();
        prop_assert!(!result.shift_indices.contains(&(signal.len() - 1)));
        prop_assert_eq!(result.edge_response.len(), signal.len());
    }

    #[test]
    fn all_missing_is_always_degenerate(len in 1usize..100, window in 1usize..10) {
        let detector = AnomalyDetector::new(DetectorConfig::new(window, 95.0)).unwrap();
        let err = detector.detect(&vec![0.0; len]).unwrap_err();
        prop_assert!(err.is_recoverable());
    }
}
