use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use uuid::Uuid;

use crate::series::DeviceSnapshot;

/// Default number of notices kept in the alarm log.
pub const DEFAULT_ALARM_LIMIT: usize = 50;

/// Where a notice came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmSource {
    /// Raised by this process when a device entered alarm
    Live,
    /// Loaded from the upstream server's alarm history
    History,
}

/// A device entering the alarm state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmNotice {
    pub id: Uuid,
    pub device_id: String,
    pub location: String,
    pub temperature: Option<f64>,
    pub smoke_level: Option<f64>,
    pub message: String,
    pub raised_at: DateTime<Utc>,
    pub source: AlarmSource,
}

impl AlarmNotice {
    #[must_use]
    pub fn live(snapshot: &DeviceSnapshot, raised_at: DateTime<Utc>) -> Self {
        let location = snapshot.display_name().to_string();
        Self {
            id: Uuid::new_v4(),
            device_id: snapshot.device_id.clone(),
            message: format!("{location} detected fire risk!"),
            location,
            temperature: snapshot.temperature.filter(|v| v.is_finite()),
            smoke_level: snapshot.smoke_level.filter(|v| v.is_finite()),
            raised_at,
            source: AlarmSource::Live,
        }
    }
}

/// Bounded log of alarm notices, newest first.
#[derive(Debug, Clone)]
pub struct AlarmLog {
    notices: VecDeque<AlarmNotice>,
    limit: usize,
}

impl Default for AlarmLog {
    fn default() -> Self {
        Self::new(DEFAULT_ALARM_LIMIT)
    }
}

impl AlarmLog {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            notices: VecDeque::with_capacity(limit),
            limit,
        }
    }

    pub fn record(&mut self, notice: AlarmNotice) {
        self.notices.push_front(notice);
        self.notices.truncate(self.limit);
    }

    /// Insert notices keeping the log ordered newest first.
    pub fn extend_sorted(&mut self, notices: impl IntoIterator<Item = AlarmNotice>) {
        self.notices.extend(notices);
        self.notices
            .make_contiguous()
            .sort_by(|a, b| b.raised_at.cmp(&a.raised_at));
        self.notices.truncate(self.limit);
    }

    /// Up to `limit` notices, newest first.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<AlarmNotice> {
        self.notices.iter().take(limit).cloned().collect()
    }

    /// Count notices raised on `date` in the given timezone.
    #[must_use]
    pub fn count_on<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> usize {
        self.notices
            .iter()
            .filter(|n| n.raised_at.with_timezone(tz).date_naive() == date)
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
