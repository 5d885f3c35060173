//! Streaming aggregation with buffered flushing
//!
//! Wraps a [`BatchAggregator`] behind a bounded input buffer. Two triggers
//! drive a flush: the buffer reaching capacity, or the configured window
//! elapsing since the last flush. Both are checked synchronously inside
//! [`StreamingAggregator::add_point`]; a quiescent stream never flushes on
//! its own, so callers needing bounded latency under quiescence should
//! drive [`StreamingAggregator::try_flush`] from an external ticker.
//!
//! Completed batches are pushed to a bounded output channel with a
//! non-blocking send. When the channel is full the whole batch is dropped:
//! ingestion liveness is deliberately favored over output completeness,
//! and each drop is counted in the shared metrics and logged.

use crate::batch::BatchAggregator;
use crate::config::AggregationConfig;
use crate::error::{AggregateError, Result};
use crate::metrics::AggregatorMetrics;
use crate::types::{AggregatedLightData, Sample};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Depth of the bounded output channel, matching the batch backlog a
/// well-behaved consumer is expected to absorb.
const DEFAULT_OUTPUT_CAPACITY: usize = 10;

/// Buffers samples and emits aggregated batches through a bounded channel
///
/// Owns mutable state (buffer, last-flush clock) and assumes a single
/// logical producer calling [`add_point`](Self::add_point) sequentially;
/// multiple producers sharing one instance need external synchronization.
#[derive(Debug)]
pub struct StreamingAggregator {
    aggregator: BatchAggregator,
    buffer: Vec<Sample>,
    buffer_capacity: usize,
    window: Duration,
    last_flush: Instant,
    /// `None` once closed; dropping the sender signals end-of-stream
    output: Option<mpsc::Sender<Vec<AggregatedLightData>>>,
    metrics: Arc<AggregatorMetrics>,
}

impl StreamingAggregator {
    /// Create a streaming aggregator and the receiving end of its output
    ///
    /// The receiver yields one `Vec<AggregatedLightData>` per flushed batch
    /// until [`close`](Self::close) ends the stream.
    pub fn new(
        config: AggregationConfig,
        buffer_capacity: usize,
        window: Duration,
    ) -> Result<(Self, mpsc::Receiver<Vec<AggregatedLightData>>)> {
        Self::with_output_capacity(config, buffer_capacity, window, DEFAULT_OUTPUT_CAPACITY)
    }

    /// Like [`new`](Self::new) with an explicit output channel depth
    pub fn with_output_capacity(
        config: AggregationConfig,
        buffer_capacity: usize,
        window: Duration,
        output_capacity: usize,
    ) -> Result<(Self, mpsc::Receiver<Vec<AggregatedLightData>>)> {
        if buffer_capacity == 0 {
            return Err(AggregateError::invalid_config(
                "buffer capacity must be greater than 0",
            ));
        }
        if window.is_zero() {
            return Err(AggregateError::invalid_config(
                "flush window must be greater than 0",
            ));
        }
        if output_capacity == 0 {
            return Err(AggregateError::invalid_config(
                "output capacity must be greater than 0",
            ));
        }

        let metrics = Arc::new(AggregatorMetrics::new());
        let aggregator = BatchAggregator::new(config)?.with_metrics(Arc::clone(&metrics));
        let (tx, rx) = mpsc::channel(output_capacity);

        info!(
            buffer_capacity,
            window_ms = window.as_millis() as u64,
            output_capacity,
            "created streaming aggregator"
        );

        Ok((
            Self {
                aggregator,
                buffer: Vec::with_capacity(buffer_capacity),
                buffer_capacity,
                window,
                last_flush: Instant::now(),
                output: Some(tx),
                metrics,
            },
            rx,
        ))
    }

    /// Share a metrics handle instead of the internally created one
    pub fn with_metrics(mut self, metrics: Arc<AggregatorMetrics>) -> Self {
        self.aggregator = self.aggregator.with_metrics(Arc::clone(&metrics));
        self.metrics = metrics;
        self
    }

    /// Handle to this aggregator's metrics counters
    pub fn metrics(&self) -> Arc<AggregatorMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Number of samples currently buffered
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Whether [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.output.is_none()
    }

    /// Buffer a sample, flushing synchronously if a trigger fires
    ///
    /// Flushes when the buffer reaches capacity or when the window has
    /// elapsed since the last flush. Returns [`AggregateError::Closed`]
    /// after [`close`](Self::close).
    pub fn add_point(&mut self, sample: Sample) -> Result<()> {
        if self.is_closed() {
            return Err(AggregateError::Closed);
        }

        self.buffer.push(sample);

        if self.buffer.len() >= self.buffer_capacity || self.last_flush.elapsed() >= self.window {
            self.flush_buffer();
        }
        Ok(())
    }

    /// Flush any buffered samples immediately
    ///
    /// Entry point for an external ticker that bounds latency when the
    /// stream goes quiet. A no-op on an empty buffer.
    pub fn try_flush(&mut self) -> Result<()> {
        if self.is_closed() {
            return Err(AggregateError::Closed);
        }
        self.flush_buffer();
        Ok(())
    }

    /// Flush residual samples and end the output stream
    ///
    /// Idempotent: a second call is a no-op. No samples can be added
    /// afterward.
    pub fn close(&mut self) {
        if self.is_closed() {
            return;
        }
        self.flush_buffer();
        // Dropping the sender signals end-of-stream to the receiver
        self.output = None;
        info!("closed streaming aggregator");
    }

    /// Aggregate and emit the current buffer contents
    ///
    /// The buffer is cleared and the flush clock reset whether or not the
    /// send succeeded; a full output channel drops the batch.
    fn flush_buffer(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let batch = self.aggregator.aggregate(&self.buffer);
        self.buffer.clear();
        self.last_flush = Instant::now();

        if batch.is_empty() {
            return;
        }

        let Some(output) = &self.output else {
            return;
        };

        match output.try_send(batch) {
            Ok(()) => self.metrics.inc_batches_emitted(),
            Err(mpsc::error::TrySendError::Full(batch)) => {
                warn!(
                    rows = batch.len(),
                    "output channel full, dropping aggregated batch"
                );
                self.metrics.inc_batches_dropped();
            }
            Err(mpsc::error::TrySendError::Closed(batch)) => {
                debug!(
                    rows = batch.len(),
                    "output receiver gone, dropping aggregated batch"
                );
                self.metrics.inc_batches_dropped();
            }
        }
    }
}
