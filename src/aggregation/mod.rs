//! Incremental statistics over brightness values
//!
//! One [`BrightnessAccumulator`] tracks the running count, sum, minimum and
//! maximum for a single aggregation group. Accumulators are owned by one
//! group key within one aggregation pass and never shared across passes.

mod accumulator;

pub use accumulator::BrightnessAccumulator;
