use super::error::SeriesError;
use super::field::SensorField;
use super::risk::{self, CombinedRisk};
use super::snapshot::{finite_or_zero, DeviceSnapshot};
use super::view::{ChartProjection, ChartView};
use super::window::{AggregatedSample, SeriesWindow, DEFAULT_CAPACITY};

/// Owns the bounded history of cross-device averages and serves the raw and
/// risk-normalized projections used for charting.
///
/// Not thread-safe on its own; a multi-threaded host wraps it in a lock.
/// Every read returns an owned copy so render code cannot touch the window.
#[derive(Debug, Clone)]
pub struct SensorSeriesAggregator {
    window: SeriesWindow,
}

impl Default for SensorSeriesAggregator {
    fn default() -> Self {
        Self {
            window: SeriesWindow::new(DEFAULT_CAPACITY),
        }
    }
}

/// Running means over the valid snapshots of one batch.
///
/// Updated per contributor as `mean * (k - 1) / k + v / k`, so finite
/// readings near `f64::MAX` never overflow an intermediate sum.
#[derive(Default)]
struct BatchMeans {
    temperature: f64,
    humidity: f64,
    smoke: f64,
    flame: f64,
    light: f64,
    contributors: usize,
}

fn fold_mean(mean: &mut f64, value: f64, k: f64) {
    *mean = *mean - *mean / k + value / k;
}

impl BatchMeans {
    fn add(&mut self, snapshot: &DeviceSnapshot) -> bool {
        let Some((temperature, smoke)) = snapshot.core_readings() else {
            return false;
        };
        self.contributors += 1;
        let k = self.contributors as f64;
        fold_mean(&mut self.temperature, temperature, k);
        fold_mean(&mut self.smoke, smoke, k);
        fold_mean(&mut self.humidity, finite_or_zero(snapshot.humidity), k);
        fold_mean(&mut self.flame, finite_or_zero(snapshot.flame), k);
        fold_mean(&mut self.light, finite_or_zero(snapshot.light_level), k);
        true
    }

    fn into_sample(self, label: String) -> AggregatedSample {
        if self.contributors == 0 {
            return AggregatedSample::empty(label);
        }
        AggregatedSample {
            label,
            avg_temperature_c: finite_or_zero(Some(self.temperature)),
            avg_humidity_pct: finite_or_zero(Some(self.humidity)),
            avg_smoke: finite_or_zero(Some(self.smoke)),
            avg_flame_raw: finite_or_zero(Some(self.flame)),
            avg_light: finite_or_zero(Some(self.light)),
            contributors: self.contributors,
        }
    }
}

impl SensorSeriesAggregator {
    /// Create an aggregator keeping the last `capacity` samples.
    ///
    /// # Errors
    ///
    /// Returns `SeriesError::InvalidCapacity` when `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, SeriesError> {
        Ok(Self {
            window: SeriesWindow::with_capacity(capacity)?,
        })
    }

    /// Average one batch of snapshots and append the result to the window.
    ///
    /// Only snapshots with finite temperature and smoke readings contribute.
    /// Optional channels of a contributor count as zero when missing or
    /// non-finite. An empty or fully invalid batch still appends an
    /// all-zero sample.
    pub fn ingest(
        &mut self,
        snapshots: &[DeviceSnapshot],
        label: impl Into<String>,
    ) -> AggregatedSample {
        let mut means = BatchMeans::default();
        let mut rejected = 0usize;
        for snapshot in snapshots {
            if !means.add(snapshot) {
                rejected += 1;
            }
        }

        let sample = means.into_sample(label.into());
        tracing::debug!(
            label = %sample.label,
            contributors = sample.contributors,
            rejected,
            "batch_aggregated"
        );

        if let Some(evicted) = self.window.push(sample.clone()) {
            tracing::trace!(label = %evicted.label, "sample_evicted");
        }
        sample
    }

    /// Window labels, oldest first.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.window.iter().map(|s| s.label.clone()).collect()
    }

    /// Raw averages of one channel, oldest first.
    #[must_use]
    pub fn raw_series(&self, field: SensorField) -> Vec<f64> {
        self.window.iter().map(|s| field.value_of(s)).collect()
    }

    /// Risk scores for the combined view, aligned with `labels()`.
    #[must_use]
    pub fn combined_risk_series(&self) -> CombinedRisk {
        let mut scores = CombinedRisk {
            temperature: Vec::with_capacity(self.window.len()),
            smoke: Vec::with_capacity(self.window.len()),
            flame: Vec::with_capacity(self.window.len()),
        };
        for sample in self.window.iter() {
            scores
                .temperature
                .push(risk::temperature_risk(sample.avg_temperature_c));
            scores.smoke.push(risk::smoke_risk(sample.avg_smoke));
            scores.flame.push(risk::flame_risk(sample.avg_flame_raw));
        }
        scores
    }

    /// Build the data for one chart view without touching stored samples.
    #[must_use]
    pub fn project(&self, view: ChartView) -> ChartProjection {
        let labels = self.labels();
        match view.raw_field() {
            None => ChartProjection::Combined {
                labels,
                risk: self.combined_risk_series(),
            },
            Some(field) => ChartProjection::Raw {
                field,
                labels,
                values: self.raw_series(field),
            },
        }
    }

    /// Copy of every sample in the window, oldest first.
    #[must_use]
    pub fn samples(&self) -> Vec<AggregatedSample> {
        self.window.iter().cloned().collect()
    }

    #[must_use]
    pub fn latest(&self) -> Option<AggregatedSample> {
        self.window.latest().cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }
}
