//! Symmetric sliding windows.
//!
//! Windows near the series ends shrink instead of wrapping, so every index
//! produced here lies in `[0, len)`.

use std::ops::Range;

/// Index range of the window `{t : |t - index| <= half_width}` clipped to `[0, len)`.
pub fn symmetric_bounds(index: usize, half_width: usize, len: usize) -> Range<usize> {
    let start = index.saturating_sub(half_width);
    let end = index.saturating_add(half_width).saturating_add(1).min(len);
    start..end.max(start)
}

/// Apply `f` to the symmetric window around every index.
///
/// # Example
/// ```
/// use methane_anomaly::transform::rolling_apply_symmetric;
///
/// let sums = rolling_apply_symmetric(&[1.0, 2.0, 3.0, 4.0], 1, |_, w| w.iter().sum::<f64>());
/// assert_eq!(sums, vec![3.0, 6.0, 9.0, 7.0]);
/// ```
pub fn rolling_apply_symmetric<T, F>(series: &[f64], half_width: usize, mut f: F) -> Vec<T>
where
    F: FnMut(usize, &[f64]) -> T,
{
    let n = series.len();
    (0..n)
        .map(|i| f(i, &series[symmetric_bounds(i, half_width, n)]))
        .collect()
}
