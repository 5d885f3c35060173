//! End-to-end tests driving a streaming aggregator the way an ingestion
//! worker would: one producer feeding points, one consumer draining batches
//! from the output channel until end-of-stream.

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use lightgrid::{AggregationConfig, BoundingBox, Sample, StreamingAggregator};
use std::time::Duration;

fn t0() -> DateTime<Utc> {
    // 2021-01-01T12:00:00Z
    Utc.timestamp_millis_opt(1_609_502_400_000).unwrap()
}

#[tokio::test]
async fn streaming_pipeline_delivers_all_batches() {
    let (mut agg, mut rx) = StreamingAggregator::new(
        AggregationConfig::medium_resolution(),
        5,
        Duration::from_secs(3600),
    )
    .unwrap();

    let consumer = tokio::spawn(async move {
        let mut batches = Vec::new();
        while let Some(batch) = rx.recv().await {
            batches.push(batch);
        }
        batches
    });

    // 12 points in one cell/bucket: two full flushes plus a residual of 2
    for i in 0..12 {
        agg.add_point(Sample::new(t0(), 121.50000, 25.05000, i as f64))
            .unwrap();
    }
    agg.close();

    let batches = consumer.await.unwrap();
    assert_eq!(batches.len(), 3);

    let total: u64 = batches
        .iter()
        .flat_map(|batch| batch.iter())
        .map(|row| row.count)
        .sum();
    assert_eq!(total, 12);

    // Final batch covers the two residual points
    assert_eq!(batches[2][0].count, 2);
}

#[tokio::test]
async fn streaming_respects_filters_and_reports_metrics() {
    let config = AggregationConfig::medium_resolution()
        .with_filter_bounds(BoundingBox::new(121.0, 122.0, 25.0, 26.0));
    let (mut agg, mut rx) =
        StreamingAggregator::new(config, 4, Duration::from_secs(3600)).unwrap();

    agg.add_point(Sample::new(t0(), 121.5, 25.05, 10.0)).unwrap();
    agg.add_point(Sample::new(t0(), 130.0, 25.05, 99.0)).unwrap(); // filtered
    agg.add_point(Sample::new(t0(), 121.5, 25.05, f64::NAN)).unwrap(); // rejected
    agg.add_point(Sample::new(t0(), 121.5, 25.05, 20.0)).unwrap(); // triggers flush

    let metrics = agg.metrics();
    agg.close();

    let batch = rx.recv().await.unwrap();
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].count, 2);
    assert_eq!(batch[0].avg_brightness, 15.0);
    assert!(rx.recv().await.is_none());

    let snap = metrics.snapshot();
    assert_eq!(snap.samples_admitted, 2);
    assert_eq!(snap.samples_filtered, 1);
    assert_eq!(snap.samples_rejected, 1);
    assert_eq!(snap.batches_emitted, 1);
    assert_eq!(snap.batches_dropped, 0);
}

#[tokio::test]
async fn distinct_groups_arrive_as_separate_rows() {
    let (mut agg, mut rx) = StreamingAggregator::new(
        AggregationConfig::medium_resolution(),
        4,
        Duration::from_secs(3600),
    )
    .unwrap();

    // Two cells, two buckets: four groups
    agg.add_point(Sample::new(t0(), 121.5, 25.05, 1.0)).unwrap();
    agg.add_point(Sample::new(t0(), 121.7, 25.05, 2.0)).unwrap();
    agg.add_point(Sample::new(t0() + ChronoDuration::hours(2), 121.5, 25.05, 3.0))
        .unwrap();
    agg.add_point(Sample::new(t0() + ChronoDuration::hours(2), 121.7, 25.05, 4.0))
        .unwrap();
    agg.close();

    let batch = rx.recv().await.unwrap();
    assert_eq!(batch.len(), 4);
    assert!(batch.iter().all(|row| row.count == 1));
    assert!(rx.recv().await.is_none());
}
