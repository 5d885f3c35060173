use serde::{Deserialize, Serialize};

/// Running statistics for one aggregation group
///
/// # Examples
///
/// ```
/// use lightgrid::aggregation::BrightnessAccumulator;
///
/// let mut acc = BrightnessAccumulator::new();
/// acc.add(10.0);
/// acc.add(20.0);
///
/// assert_eq!(acc.count(), 2);
/// assert_eq!(acc.average(), 15.0);
/// assert_eq!(acc.min(), Some(10.0));
/// assert_eq!(acc.max(), Some(20.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrightnessAccumulator {
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
    count: u64,
}

impl BrightnessAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a brightness value into the running statistics
    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        self.min = Some(match self.min {
            Some(current) => current.min(value),
            None => value,
        });
        self.max = Some(match self.max {
            Some(current) => current.max(value),
            None => value,
        });
    }

    /// Mean of all folded values, 0.0 when empty
    ///
    /// An empty accumulator never reaches output in practice since groups
    /// are only created on first admission.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// Minimum folded value, if any
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    /// Maximum folded value, if any
    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Sum of all folded values
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Number of folded values
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Whether anything has been folded in yet
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
