//! Discrete convolution helpers.

/// Step-edge kernel: `half_width` samples of `+1` followed by `half_width` samples of `-1`.
pub fn step_kernel(half_width: usize) -> Vec<f64> {
    let mut kernel = vec![1.0; half_width];
    kernel.extend(std::iter::repeat(-1.0).take(half_width));
    kernel
}

/// Full linear convolution, length `signal.len() + kernel.len() - 1`.
pub fn convolve_full(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    if signal.is_empty() || kernel.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; signal.len() + kernel.len() - 1];
    for (i, &s) in signal.iter().enumerate() {
        for (j, &k) in kernel.iter().enumerate() {
            out[i + j] += s * k;
        }
    }
    out
}

/// Centered convolution with the same length as the longer input.
///
/// The output is the central part of the full convolution, starting at
/// offset `(kernel.len() - 1) / 2`.
///
/// # Example
/// ```
/// use methane_anomaly::transform::convolve_same;
///
/// let out = convolve_same(&[1.0, 2.0, 3.0], &[0.0, 1.0, 0.5]);
/// assert_eq!(out, vec![1.0, 2.5, 4.0]);
/// ```
pub fn convolve_same(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    let full = convolve_full(signal, kernel);
    if full.is_empty() {
        return Vec::new();
    }
    let (long, short) = if signal.len() >= kernel.len() {
        (signal.len(), kernel.len())
    } else {
        (kernel.len(), signal.len())
    };
    let offset = (short - 1) / 2;
    full[offset..offset + long].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn step_kernel_shape() {
        assert_eq!(step_kernel(2), vec![1.0, 1.0, -1.0, -1.0]);
        assert!(step_kernel(0).is_empty());
    }

    #[test]
    fn full_convolution() {
        assert_eq!(
            convolve_full(&[1.0, 2.0, 3.0], &[1.0, 1.0]),
            vec![1.0, 3.0, 5.0, 3.0]
        );
        assert!(convolve_full(&[], &[1.0]).is_empty());
    }

    #[test]
    fn same_convolution_even_kernel() {
        // offset (2 - 1) / 2 = 0
        assert_eq!(convolve_same(&[1.0, 2.0, 3.0], &[1.0, 1.0]), vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn same_convolution_preserves_length() {
        let signal: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let out = convolve_same(&signal, &step_kernel(3));
        assert_eq!(out.len(), signal.len());
    }

    #[test]
    fn step_kernel_responds_to_level_shift() {
        let mut signal = vec![0.0; 20];
        signal[10..].iter_mut().for_each(|x| *x = 4.0);
        let response: Vec<f64> = convolve_same(&signal, &step_kernel(2))
            .into_iter()
            .map(f64::abs)
            .collect();

        let argmax = response
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc })
            .0;
        assert!((9..=10).contains(&argmax));
        assert_relative_eq!(response[argmax], 8.0);
        // flat regions away from the edges respond with zero
        assert_relative_eq!(response[5], 0.0);
        assert_relative_eq!(response[15], 0.0);
    }
}
