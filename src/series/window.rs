use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::num::NonZeroUsize;

use super::error::SeriesError;

/// Default number of samples kept for charting.
pub const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::new(20).unwrap();

/// Cross-device average of one ingested batch.
///
/// Every field is finite. A batch with no valid contributors produces all
/// zeros.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSample {
    /// Wall-clock label supplied by the caller
    pub label: String,
    pub avg_temperature_c: f64,
    pub avg_humidity_pct: f64,
    pub avg_smoke: f64,
    pub avg_flame_raw: f64,
    pub avg_light: f64,
    /// Number of snapshots that contributed to the averages
    pub contributors: usize,
}

impl AggregatedSample {
    /// All-zero sample for a batch without valid contributors.
    #[must_use]
    pub fn empty(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

/// Fixed-capacity FIFO of aggregated samples, oldest first.
#[derive(Debug, Clone)]
pub struct SeriesWindow {
    samples: VecDeque<AggregatedSample>,
    capacity: NonZeroUsize,
}

impl SeriesWindow {
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.get()),
            capacity,
        }
    }

    /// Build a window from a plain count.
    ///
    /// # Errors
    ///
    /// Returns `SeriesError::InvalidCapacity` when `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, SeriesError> {
        NonZeroUsize::new(capacity)
            .map(Self::new)
            .ok_or(SeriesError::InvalidCapacity)
    }

    /// Append a sample, evicting the oldest one first when full.
    ///
    /// Returns the evicted sample, if any.
    pub fn push(&mut self, sample: AggregatedSample) -> Option<AggregatedSample> {
        let evicted = if self.samples.len() == self.capacity.get() {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity.get()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&AggregatedSample> {
        self.samples.back()
    }

    /// Iterate samples oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &AggregatedSample> {
        self.samples.iter()
    }
}
