//! Batch spatial-temporal aggregation
//!
//! A [`BatchAggregator`] reduces a finite slice of samples into one summary
//! row per (grid cell, time bucket) group. Each call builds a fresh group
//! map and discards it on return, so the aggregator is stateless across
//! calls and safe to use from independent callers on independent inputs.

use crate::aggregation::BrightnessAccumulator;
use crate::bucket::TimeBucketer;
use crate::config::AggregationConfig;
use crate::error::Result;
use crate::grid::GridSnapper;
use crate::metrics::AggregatorMetrics;
use crate::types::{AggregatedLightData, GroupKey, Sample};
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Reduces sample batches into grid/bucket summary rows
#[derive(Debug, Clone)]
pub struct BatchAggregator {
    config: AggregationConfig,
    snapper: GridSnapper,
    bucketer: TimeBucketer,
    metrics: Arc<AggregatorMetrics>,
}

impl BatchAggregator {
    /// Create an aggregator from a validated configuration
    pub fn new(config: AggregationConfig) -> Result<Self> {
        config.validate()?;
        let snapper = GridSnapper::new(config.spatial_resolution_km)?;
        let bucketer = TimeBucketer::new(config.temporal_interval_ms)?;
        Ok(Self {
            config,
            snapper,
            bucketer,
            metrics: Arc::new(AggregatorMetrics::new()),
        })
    }

    /// Share a metrics handle instead of the internally created one
    pub fn with_metrics(mut self, metrics: Arc<AggregatorMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// The configuration this aggregator was built with
    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Handle to this aggregator's metrics counters
    pub fn metrics(&self) -> Arc<AggregatorMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Whether a sample passes the configured spatial and temporal filters
    fn admits(&self, sample: &Sample) -> bool {
        if let Some(bounds) = &self.config.filter_bounds {
            if !bounds.contains(sample.longitude, sample.latitude) {
                return false;
            }
        }
        if let Some(range) = &self.config.time_range {
            if !range.contains(sample.time) {
                return false;
            }
        }
        true
    }

    /// Aggregate a batch of samples into one row per live group
    ///
    /// Malformed samples (non-finite values, pole latitudes) are rejected
    /// per sample and counted; they never abort the pass. The order of the
    /// returned rows is unspecified. No partial output is produced: the
    /// whole input batch is consumed before any row is materialized.
    pub fn aggregate(&self, samples: &[Sample]) -> Vec<AggregatedLightData> {
        let mut groups: HashMap<GroupKey, BrightnessAccumulator> = HashMap::new();
        let mut admitted = 0u64;
        let mut filtered = 0u64;
        let mut rejected = 0u64;

        for sample in samples {
            if !sample.is_finite() {
                trace!(?sample, "rejecting non-finite sample");
                rejected += 1;
                continue;
            }

            if !self.admits(sample) {
                filtered += 1;
                continue;
            }

            let cell = match self.snapper.snap(sample.longitude, sample.latitude) {
                Ok(cell) => cell,
                Err(err) => {
                    trace!(?sample, %err, "rejecting sample");
                    rejected += 1;
                    continue;
                }
            };
            let bucket_ms = self.bucketer.bucket_start_ms(sample.time);

            let key = GroupKey { cell, bucket_ms };
            groups.entry(key).or_default().add(sample.brightness);
            admitted += 1;
        }

        self.metrics.add_admitted(admitted);
        self.metrics.add_filtered(filtered);
        self.metrics.add_rejected(rejected);

        debug!(
            input = samples.len(),
            admitted,
            filtered,
            rejected,
            groups = groups.len(),
            "aggregated batch"
        );

        groups
            .into_iter()
            .map(|(key, acc)| self.materialize(key, &acc))
            .collect()
    }

    /// Build the output row for one group
    fn materialize(&self, key: GroupKey, acc: &BrightnessAccumulator) -> AggregatedLightData {
        let (grid_longitude, grid_latitude) = self.snapper.cell_center(key.cell);
        AggregatedLightData {
            grid_longitude,
            grid_latitude,
            // Key millis came from a valid timestamp, so this always maps back
            time_bucket: Utc
                .timestamp_millis_opt(key.bucket_ms)
                .single()
                .unwrap_or_default(),
            avg_brightness: acc.average(),
            min_brightness: acc.min().unwrap_or_default(),
            max_brightness: acc.max().unwrap_or_default(),
            count: acc.count(),
        }
    }
}
