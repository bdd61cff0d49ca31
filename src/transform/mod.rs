//! Signal transformations used by the detection stages.
//!
//! Provides symmetric sliding windows and centered convolution.

pub mod convolve;
pub mod window;

pub use convolve::{convolve_full, convolve_same, step_kernel};
pub use window::{rolling_apply_symmetric, symmetric_bounds};
