//! Spatial-temporal aggregation engine for geolocated brightness samples
//!
//! This crate reduces streams or batches of geolocated brightness samples
//! into regular-grid, time-bucketed statistical summaries (count, min, max,
//! average) for downstream storage and analytics.
//!
//! Samples are snapped onto a latitude-aware grid of fixed physical
//! resolution, floored onto epoch-aligned time buckets, and folded into one
//! incremental accumulator per (cell, bucket) group. [`BatchAggregator`]
//! handles finite batches; [`StreamingAggregator`] adds a bounded buffer
//! with size- and time-based flush triggers and a drop-on-full output
//! channel for long-running ingestion.
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use lightgrid::{AggregationConfig, BatchAggregator, Sample};
//!
//! let aggregator = BatchAggregator::new(AggregationConfig::medium_resolution()).unwrap();
//!
//! let t0 = Utc.timestamp_opt(1_609_502_400, 0).unwrap();
//! let rows = aggregator.aggregate(&[
//!     Sample::new(t0, 121.50000, 25.05000, 10.0),
//!     Sample::new(t0, 121.50010, 25.05010, 20.0),
//! ]);
//!
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].avg_brightness, 15.0);
//! ```

pub mod aggregation;
pub mod batch;
pub mod bucket;
pub mod config;
pub mod error;
pub mod grid;
pub mod metrics;
pub mod streaming;
pub mod types;

pub use batch::BatchAggregator;
pub use bucket::TimeBucketer;
pub use config::{AggregationConfig, AggregationMethod};
pub use error::{AggregateError, Result};
pub use grid::GridSnapper;
pub use metrics::{AggregatorMetrics, MetricsSnapshot};
pub use streaming::StreamingAggregator;
pub use types::{AggregatedLightData, BoundingBox, GridCell, GroupKey, Sample, TimeRange};
