//! Configuration for the aggregation engine
//!
//! A configuration is constructed by the caller, validated at aggregator
//! creation, and owned exclusively by the aggregator built from it. The
//! common resolution/interval pairings are provided as factory functions
//! returning fresh values, never as shared mutable statics.

use crate::error::{AggregateError, Result};
use crate::types::{BoundingBox, TimeRange};
use serde::{Deserialize, Serialize};

/// Which statistic a summary row is primarily reporting
///
/// Every output row carries avg, min, max and count regardless; the method
/// records the caller's intent for downstream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMethod {
    Average,
    Sum,
    Max,
    Min,
}

impl Default for AggregationMethod {
    fn default() -> Self {
        Self::Average
    }
}

/// Parameters for spatial-temporal aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Edge length of a grid cell in kilometers
    pub spatial_resolution_km: f64,

    /// Width of a time bucket in milliseconds
    pub temporal_interval_ms: u64,

    /// Primary statistic for downstream consumers
    #[serde(default)]
    pub aggregation_method: AggregationMethod,

    /// Optional spatial filter (inclusive bounds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_bounds: Option<BoundingBox>,

    /// Optional temporal filter (inclusive bounds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
}

const MINUTE_MS: u64 = 60 * 1000;
const HOUR_MS: u64 = 60 * MINUTE_MS;

impl AggregationConfig {
    /// Create a configuration with the given resolution and interval
    pub fn new(spatial_resolution_km: f64, temporal_interval_ms: u64) -> Self {
        Self {
            spatial_resolution_km,
            temporal_interval_ms,
            aggregation_method: AggregationMethod::Average,
            filter_bounds: None,
            time_range: None,
        }
    }

    /// 500 m grid, 15-minute buckets
    pub fn high_resolution() -> Self {
        Self::new(0.5, 15 * MINUTE_MS)
    }

    /// 1 km grid, 1-hour buckets
    pub fn medium_resolution() -> Self {
        Self::new(1.0, HOUR_MS)
    }

    /// 5 km grid, daily buckets
    pub fn low_resolution() -> Self {
        Self::new(5.0, 24 * HOUR_MS)
    }

    /// Restrict aggregation to samples inside the given bounds
    pub fn with_filter_bounds(mut self, bounds: BoundingBox) -> Self {
        self.filter_bounds = Some(bounds);
        self
    }

    /// Restrict aggregation to samples inside the given time range
    pub fn with_time_range(mut self, range: TimeRange) -> Self {
        self.time_range = Some(range);
        self
    }

    /// Set the primary statistic
    pub fn with_method(mut self, method: AggregationMethod) -> Self {
        self.aggregation_method = method;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.spatial_resolution_km.is_finite() || self.spatial_resolution_km <= 0.0 {
            return Err(AggregateError::invalid_config(format!(
                "spatial resolution must be positive and finite, got {}",
                self.spatial_resolution_km
            )));
        }

        if self.temporal_interval_ms == 0 {
            return Err(AggregateError::invalid_config(
                "temporal interval must be greater than 0",
            ));
        }

        if let Some(bounds) = &self.filter_bounds {
            if bounds.min_longitude > bounds.max_longitude
                || bounds.min_latitude > bounds.max_latitude
            {
                return Err(AggregateError::invalid_config(
                    "filter bounds minimum must not exceed maximum",
                ));
            }
        }

        if let Some(range) = &self.time_range {
            if range.start > range.end {
                return Err(AggregateError::invalid_config(
                    "time range start must not be after end",
                ));
            }
        }

        Ok(())
    }
}
