use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::lenient;

/// Alarm state reported by the upstream server for one device.
///
/// Upstream labels are either English (`normal`, `warning`, `alarm`) or the
/// Chinese labels the device firmware emits (`正常`, `警告`, `警报`).
/// Anything else decodes as `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Value")]
pub enum DeviceStatus {
    Normal,
    Warning,
    Alarm,
    #[default]
    Unknown,
}

impl DeviceStatus {
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "正常" => Self::Normal,
            "警告" => Self::Warning,
            "警报" => Self::Alarm,
            other => match other.to_lowercase().as_str() {
                "normal" => Self::Normal,
                "warning" => Self::Warning,
                "alarm" => Self::Alarm,
                _ => Self::Unknown,
            },
        }
    }

    #[must_use]
    pub const fn is_alarm(self) -> bool {
        matches!(self, Self::Alarm)
    }
}

impl From<Value> for DeviceStatus {
    fn from(value: Value) -> Self {
        value.as_str().map_or(Self::Unknown, Self::from_label)
    }
}

/// One device's instantaneous reading, as delivered by a data source.
///
/// Every numeric field is optional: a field holding `null`, a string, or
/// anything else that is not a JSON number decodes as `None`. Firmware and
/// transport glitches are expected, so decoding never rejects a snapshot
/// because of a bad reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    #[serde(default, deserialize_with = "lenient::string")]
    pub device_id: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub smoke_level: Option<f64>,
    /// Raw flame sensor output. Lower values mean a stronger flame signal.
    #[serde(default, deserialize_with = "lenient::number")]
    pub flame: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub light_level: Option<f64>,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(
        default,
        alias = "last_update",
        deserialize_with = "lenient::epoch_seconds"
    )]
    pub last_update_epoch_seconds: Option<i64>,
}

impl DeviceSnapshot {
    #[must_use]
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            ..Self::default()
        }
    }

    /// Readings averaged only when both core channels carry a finite value.
    #[must_use]
    pub fn core_readings(&self) -> Option<(f64, f64)> {
        match (self.temperature, self.smoke_level) {
            (Some(t), Some(s)) if t.is_finite() && s.is_finite() => Some((t, s)),
            _ => None,
        }
    }

    /// Display label: location when known, device id otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.location
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(&self.device_id)
    }
}

/// One batch of snapshots as delivered by a data source.
///
/// Entries that are not JSON objects, such as `null`, are dropped instead of
/// failing the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct DeviceBatch(#[serde(deserialize_with = "lenient::elements")] pub Vec<DeviceSnapshot>);

impl DeviceBatch {
    #[must_use]
    pub fn into_inner(self) -> Vec<DeviceSnapshot> {
        self.0
    }
}

/// Optional channels contribute zero unless they hold a finite number.
#[must_use]
pub fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}
