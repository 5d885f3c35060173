//! Epoch-aligned time bucketing
//!
//! Snaps timestamps onto fixed-width intervals counted from the Unix epoch,
//! never from the first observed sample. Buckets are therefore stable and
//! reproducible across independent runs and independent aggregators that
//! share an interval, which is what makes their outputs joinable.

use crate::error::{AggregateError, Result};
use chrono::{DateTime, TimeZone, Utc};

/// Floors timestamps to interval boundaries counted from the Unix epoch
#[derive(Debug, Clone)]
pub struct TimeBucketer {
    interval_ms: i64,
}

impl TimeBucketer {
    /// Create a bucketer for the given interval
    pub fn new(interval_ms: u64) -> Result<Self> {
        if interval_ms == 0 {
            return Err(AggregateError::invalid_config(
                "temporal interval must be greater than 0",
            ));
        }
        Ok(Self {
            interval_ms: interval_ms as i64,
        })
    }

    /// Start of the bucket containing `timestamp`, always UTC and ≤ input
    ///
    /// Uses euclidean division so pre-epoch timestamps still floor downward
    /// instead of truncating toward the epoch.
    pub fn bucket_start(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        let millis = timestamp.timestamp_millis();
        let aligned = millis.div_euclid(self.interval_ms) * self.interval_ms;
        // Aligned millis never exceed the input, which chrono can represent
        Utc.timestamp_millis_opt(aligned)
            .single()
            .unwrap_or(timestamp)
    }

    /// Bucket start as epoch milliseconds, for use inside group keys
    pub fn bucket_start_ms(&self, timestamp: DateTime<Utc>) -> i64 {
        timestamp.timestamp_millis().div_euclid(self.interval_ms) * self.interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    const HOUR_MS: u64 = 60 * 60 * 1000;

    #[test]
    fn test_rejects_zero_interval() {
        assert!(TimeBucketer::new(0).is_err());
    }

    #[test]
    fn test_floors_to_interval_boundary() {
        let bucketer = TimeBucketer::new(HOUR_MS).unwrap();

        // 2021-01-01T12:34:56Z floors to 12:00:00
        let input = ts(1_609_504_496_000);
        assert_eq!(bucketer.bucket_start(input), ts(1_609_502_400_000));
    }

    #[test]
    fn test_boundary_is_its_own_bucket_start() {
        let bucketer = TimeBucketer::new(HOUR_MS).unwrap();
        let boundary = ts(1_609_502_400_000);
        assert_eq!(bucketer.bucket_start(boundary), boundary);
    }

    #[test]
    fn test_result_never_exceeds_input() {
        let bucketer = TimeBucketer::new(15 * 60 * 1000).unwrap();
        for millis in [0, 1, 899_999, 900_000, 900_001, 1_609_504_496_123] {
            let input = ts(millis);
            assert!(bucketer.bucket_start(input) <= input);
        }
    }

    #[test]
    fn test_epoch_alignment_is_shared_across_instances() {
        let a = TimeBucketer::new(HOUR_MS).unwrap();
        let b = TimeBucketer::new(HOUR_MS).unwrap();
        let input = ts(1_609_504_496_000);
        assert_eq!(a.bucket_start(input), b.bucket_start(input));
    }

    #[test]
    fn test_pre_epoch_timestamps_floor_downward() {
        let bucketer = TimeBucketer::new(HOUR_MS).unwrap();

        // 30 minutes before the epoch belongs to the bucket starting one
        // hour before the epoch, not the epoch itself
        let input = ts(-30 * 60 * 1000);
        assert_eq!(bucketer.bucket_start(input), ts(-(HOUR_MS as i64)));
    }

    #[test]
    fn test_bucket_start_ms_matches_datetime() {
        let bucketer = TimeBucketer::new(HOUR_MS).unwrap();
        let input = ts(1_609_504_496_000);
        assert_eq!(
            bucketer.bucket_start_ms(input),
            bucketer.bucket_start(input).timestamp_millis()
        );
    }

    #[test]
    fn test_same_bucket_for_samples_within_interval() {
        let bucketer = TimeBucketer::new(HOUR_MS).unwrap();
        let t0 = ts(1_609_502_400_000);
        let t0_plus_5m = ts(1_609_502_400_000 + 5 * 60 * 1000);
        assert_eq!(bucketer.bucket_start(t0), bucketer.bucket_start(t0_plus_5m));
    }
}
