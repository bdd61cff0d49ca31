//! Core data structures.

pub mod series;

pub use series::{BoundingBox, MissingMarker, Series};
