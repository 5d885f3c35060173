//! Error types for the aggregation engine
//!
//! Configuration errors are fatal at construction time. Per-sample input
//! errors are filtered out of a pass and counted, never propagated. Output
//! saturation is not an error at all: a dropped batch is observable only
//! through [`crate::metrics::AggregatorMetrics`] and a warning log.

use thiserror::Error;

/// Main error type for aggregator operations
#[derive(Error, Debug)]
pub enum AggregateError {
    /// Configuration is invalid (non-positive resolution or interval)
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A sample carries values the engine cannot snap
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Operation on a streaming aggregator that has been closed
    #[error("streaming aggregator is closed")]
    Closed,
}

impl AggregateError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Result type alias for aggregator operations
pub type Result<T> = std::result::Result<T, AggregateError>;
