//! Series data structure with an explicit validity mask.
//!
//! Missing samples are tracked out-of-band instead of being encoded as a
//! numeric value, so a genuine zero reading is never confused with a gap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnomalyError, Result};

/// Convention used to recognise missing samples in raw values.
///
/// NaN and infinite values are always treated as missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum MissingMarker {
    /// Samples equal to this value are missing (the historical "no response" convention).
    Sentinel(f64),
    /// Only NaN and infinite samples are missing.
    NonFiniteOnly,
}

impl Default for MissingMarker {
    fn default() -> Self {
        MissingMarker::Sentinel(0.0)
    }
}

impl MissingMarker {
    /// Whether a raw sample is missing under this convention.
    pub fn is_missing(&self, value: f64) -> bool {
        if !value.is_finite() {
            return true;
        }
        match self {
            MissingMarker::Sentinel(sentinel) => value == *sentinel,
            MissingMarker::NonFiniteOnly => false,
        }
    }
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            min_lat: -90.0,
            max_lat: 90.0,
            min_lon: -180.0,
            max_lon: 180.0,
        }
    }
}

impl BoundingBox {
    /// Create a validated bounding box.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self> {
        let bbox = Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    /// Check latitude/longitude ranges and ordering.
    pub fn validate(&self) -> Result<()> {
        let lat_ok = (-90.0..=90.0).contains(&self.min_lat) && (-90.0..=90.0).contains(&self.max_lat);
        let lon_ok =
            (-180.0..=180.0).contains(&self.min_lon) && (-180.0..=180.0).contains(&self.max_lon);
        if !lat_ok || !lon_ok {
            return Err(AnomalyError::InvalidConfiguration(format!(
                "bounding box {:?} lies outside [-90, 90] x [-180, 180]",
                self
            )));
        }
        if self.min_lat > self.max_lat || self.min_lon > self.max_lon {
            return Err(AnomalyError::InvalidConfiguration(
                "bounding box minimum exceeds maximum".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a coordinate lies inside the box (edges included).
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&latitude)
            && (self.min_lon..=self.max_lon).contains(&longitude)
    }
}

/// An ordered univariate series with validity mask and optional auxiliary arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    values: Vec<f64>,
    valid: Vec<bool>,
    timestamps: Option<Vec<DateTime<Utc>>>,
    coordinates: Option<(Vec<f64>, Vec<f64>)>,
}

impl Series {
    /// Build a series from raw values, marking missing samples with `marker`.
    pub fn from_values(values: Vec<f64>, marker: MissingMarker) -> Self {
        let valid = values.iter().map(|&v| !marker.is_missing(v)).collect();
        Self {
            values,
            valid,
            timestamps: None,
            coordinates: None,
        }
    }

    /// Build a series from values and an explicit validity mask.
    ///
    /// Non-finite values are always marked missing regardless of the mask.
    pub fn with_validity(values: Vec<f64>, valid: Vec<bool>) -> Result<Self> {
        if valid.len() != values.len() {
            return Err(AnomalyError::DimensionMismatch {
                expected: values.len(),
                got: valid.len(),
            });
        }
        let valid = values
            .iter()
            .zip(valid)
            .map(|(v, ok)| ok && v.is_finite())
            .collect();
        Ok(Self {
            values,
            valid,
            timestamps: None,
            coordinates: None,
        })
    }

    /// Build a series where `None` marks a missing sample.
    pub fn from_options(samples: Vec<Option<f64>>) -> Self {
        let valid = samples
            .iter()
            .map(|s| s.is_some_and(f64::is_finite))
            .collect();
        let values = samples.into_iter().map(|s| s.unwrap_or(0.0)).collect();
        Self {
            values,
            valid,
            timestamps: None,
            coordinates: None,
        }
    }

    /// Attach observation timestamps (must be non-decreasing).
    pub fn with_timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Result<Self> {
        if timestamps.len() != self.len() {
            return Err(AnomalyError::DimensionMismatch {
                expected: self.len(),
                got: timestamps.len(),
            });
        }
        if timestamps.windows(2).any(|w| w[1] < w[0]) {
            return Err(AnomalyError::TimestampError(
                "timestamps must be non-decreasing".to_string(),
            ));
        }
        self.timestamps = Some(timestamps);
        Ok(self)
    }

    /// Attach per-sample latitude and longitude.
    pub fn with_coordinates(mut self, latitudes: Vec<f64>, longitudes: Vec<f64>) -> Result<Self> {
        for got in [latitudes.len(), longitudes.len()] {
            if got != self.len() {
                return Err(AnomalyError::DimensionMismatch {
                    expected: self.len(),
                    got,
                });
            }
        }
        self.coordinates = Some((latitudes, longitudes));
        Ok(self)
    }

    /// Number of samples, missing ones included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw values. Missing positions hold whatever placeholder the caller supplied.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Validity mask, `true` where the sample is present.
    pub fn validity(&self) -> &[bool] {
        &self.valid
    }

    /// Whether sample `index` is present. Out-of-range indices are invalid.
    pub fn is_valid(&self, index: usize) -> bool {
        self.valid.get(index).copied().unwrap_or(false)
    }

    /// Ascending indices of missing samples.
    pub fn missing_indices(&self) -> Vec<usize> {
        self.valid
            .iter()
            .enumerate()
            .filter(|(_, &ok)| !ok)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of present samples.
    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|&&ok| ok).count()
    }

    /// True when no sample is present.
    pub fn is_all_missing(&self) -> bool {
        self.valid_count() == 0
    }

    /// Per-sample timestamps, if attached.
    pub fn timestamps(&self) -> Option<&[DateTime<Utc>]> {
        self.timestamps.as_deref()
    }

    /// Timestamp of sample `index`, if attached.
    pub fn timestamp(&self, index: usize) -> Option<DateTime<Utc>> {
        self.timestamps.as_ref().and_then(|ts| ts.get(index).copied())
    }

    /// `(latitude, longitude)` of a sample, if coordinates are attached.
    pub fn coordinates(&self, index: usize) -> Option<(f64, f64)> {
        self.coordinates
            .as_ref()
            .and_then(|(lat, lon)| Some((*lat.get(index)?, *lon.get(index)?)))
    }

    /// Whether latitude and longitude are attached.
    pub fn has_coordinates(&self) -> bool {
        self.coordinates.is_some()
    }

    /// Keep only samples located inside `bbox`, preserving order.
    ///
    /// A series without coordinates is returned unchanged.
    pub fn within(&self, bbox: &BoundingBox) -> Result<Series> {
        bbox.validate()?;
        let Some((lat, lon)) = &self.coordinates else {
            return Ok(self.clone());
        };

        let keep: Vec<usize> = (0..self.len())
            .filter(|&i| bbox.contains(lat[i], lon[i]))
            .collect();
        let pick_f64 = |src: &[f64]| keep.iter().map(|&i| src[i]).collect::<Vec<f64>>();

        Ok(Series {
            values: pick_f64(self.values.as_slice()),
            valid: keep.iter().map(|&i| self.valid[i]).collect(),
            timestamps: self
                .timestamps
                .as_ref()
                .map(|ts| keep.iter().map(|&i| ts[i]).collect()),
            coordinates: Some((pick_f64(lat.as_slice()), pick_f64(lon.as_slice()))),
        })
    }
}
