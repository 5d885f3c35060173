//! Core data types for the aggregation engine
//!
//! Samples flow in, grouped summary rows flow out. Grid cells are held as
//! integer indices rather than snapped floating-point coordinates so that
//! two samples in the same physical cell always hash to the same group key;
//! physical coordinates are materialized only when a summary row is built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single geolocated brightness measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Measurement time (UTC)
    pub time: DateTime<Utc>,
    /// Longitude in degrees
    pub longitude: f64,
    /// Latitude in degrees
    pub latitude: f64,
    /// Measured brightness
    pub brightness: f64,
}

impl Sample {
    /// Create a new sample
    pub fn new(time: DateTime<Utc>, longitude: f64, latitude: f64, brightness: f64) -> Self {
        Self {
            time,
            longitude,
            latitude,
            brightness,
        }
    }

    /// Whether all numeric fields are finite (no NaN or infinity)
    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite() && self.brightness.is_finite()
    }
}

/// Geographic bounds for filtering, all edges inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub min_latitude: f64,
    pub max_latitude: f64,
}

impl BoundingBox {
    /// Create a new bounding box
    pub fn new(min_longitude: f64, max_longitude: f64, min_latitude: f64, max_latitude: f64) -> Self {
        Self {
            min_longitude,
            max_longitude,
            min_latitude,
            max_latitude,
        }
    }

    /// Check whether a coordinate falls inside the box (edges inclusive)
    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        longitude >= self.min_longitude
            && longitude <= self.max_longitude
            && latitude >= self.min_latitude
            && latitude <= self.max_latitude
    }
}

/// Temporal bounds for filtering, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Create a new time range
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Check whether a timestamp falls within `[start, end]`
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}

/// A grid cell identified by integer indices along each axis
///
/// Indices count cells away from the (0°, 0°) origin at the configured
/// resolution. Using integers as the grouping key avoids splitting one
/// physical cell into two keys when rounded floating-point coordinates
/// disagree in their last bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    /// Cell index along the longitude axis
    pub lon_idx: i64,
    /// Cell index along the latitude axis
    pub lat_idx: i64,
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lon_idx, self.lat_idx)
    }
}

/// Uniquely identifies one aggregation group: one grid cell in one time bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupKey {
    /// The spatial cell
    pub cell: GridCell,
    /// Bucket start as epoch milliseconds
    pub bucket_ms: i64,
}

/// Aggregated brightness statistics for one grid cell and time bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedLightData {
    /// Longitude of the cell center, rounded to 6 decimal places
    pub grid_longitude: f64,
    /// Latitude of the cell center, rounded to 6 decimal places
    pub grid_latitude: f64,
    /// Start instant of the time bucket (UTC, epoch-aligned)
    pub time_bucket: DateTime<Utc>,
    pub avg_brightness: f64,
    pub min_brightness: f64,
    pub max_brightness: f64,
    /// Number of samples folded into this group
    pub count: u64,
}
