//! Windowed aggregation of device snapshots and chart projections.
//!
//! Pure in-memory computation: no I/O, no timers, no locking.

pub mod aggregator;
pub mod error;
pub mod field;
pub mod risk;
pub mod snapshot;
pub mod view;
pub mod window;

pub use aggregator::SensorSeriesAggregator;
pub use error::SeriesError;
pub use field::SensorField;
pub use risk::CombinedRisk;
pub use snapshot::{DeviceBatch, DeviceSnapshot, DeviceStatus};
pub use view::{AxisSpec, ChartProjection, ChartView, ViewSelector};
pub use window::{AggregatedSample, SeriesWindow};
