use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::common::lenient;
use crate::monitor::{AlarmNotice, AlarmSource};

/// Response from `/api/devices`: one entry per device with sensor data.
pub type DevicesResponse = crate::series::DeviceBatch;

/// Response from `/api/history`: alarms from the last 24 hours.
pub type HistoryResponse = Vec<HistoryEntry>;

/// One alarm from the upstream server's history.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    /// Epoch seconds, possibly fractional
    #[serde(default, deserialize_with = "lenient::number")]
    pub timestamp: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub device_id: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub smoke_level: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub message: Option<String>,
}

impl HistoryEntry {
    /// Convert to a logged notice. Entries without a usable timestamp are
    /// dropped, since they cannot be placed in the log.
    #[must_use]
    pub fn into_notice(self) -> Option<AlarmNotice> {
        let raised_at = self
            .timestamp
            .filter(|t| t.is_finite())
            .and_then(|t| DateTime::<Utc>::from_timestamp_millis((t * 1000.0) as i64))?;

        let location = self
            .location
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| self.device_id.clone());
        let message = self
            .message
            .unwrap_or_else(|| format!("{location} detected fire risk!"));

        Some(AlarmNotice {
            id: Uuid::new_v4(),
            device_id: self.device_id,
            location,
            temperature: self.temperature,
            smoke_level: self.smoke_level,
            message,
            raised_at,
            source: AlarmSource::History,
        })
    }
}
