use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::{BTreeMap, HashSet};

use super::alarms::{AlarmLog, AlarmNotice};
use super::overview::StatusOverview;
use crate::series::{AggregatedSample, DeviceSnapshot, SensorSeriesAggregator, SeriesError};

/// Result of applying one batch to the dashboard.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub sample: AggregatedSample,
    pub overview: StatusOverview,
    /// Notices for devices that entered alarm with this batch
    pub raised: Vec<AlarmNotice>,
}

/// Everything the dashboard shows, fed one batch at a time.
///
/// Wraps the series aggregator together with the latest device table, the
/// status overview and the alarm log.
#[derive(Debug, Clone)]
pub struct DashboardMonitor {
    aggregator: SensorSeriesAggregator,
    devices: BTreeMap<String, DeviceSnapshot>,
    overview: StatusOverview,
    alarms: AlarmLog,
    in_alarm: HashSet<String>,
    last_batch_at: Option<DateTime<Utc>>,
}

impl DashboardMonitor {
    /// # Errors
    ///
    /// Returns `SeriesError::InvalidCapacity` when `window_capacity` is zero.
    pub fn new(window_capacity: usize, alarm_limit: usize) -> Result<Self, SeriesError> {
        Ok(Self {
            aggregator: SensorSeriesAggregator::with_capacity(window_capacity)?,
            devices: BTreeMap::new(),
            overview: StatusOverview::default(),
            alarms: AlarmLog::new(alarm_limit),
            in_alarm: HashSet::new(),
            last_batch_at: None,
        })
    }

    /// Apply one batch from a data source.
    ///
    /// The batch is averaged into the series window and replaces the device
    /// table. A notice is raised for every device that is in alarm now but
    /// was not in the previous batch; a device staying in alarm does not
    /// raise again.
    pub fn apply_batch(
        &mut self,
        snapshots: &[DeviceSnapshot],
        label: impl Into<String>,
        now: DateTime<Utc>,
    ) -> BatchOutcome {
        let sample = self.aggregator.ingest(snapshots, label);
        let overview = StatusOverview::from_snapshots(snapshots);

        let mut raised = Vec::new();
        let mut in_alarm = HashSet::new();
        self.devices.clear();

        for snapshot in snapshots {
            if snapshot.device_id.is_empty() {
                continue;
            }
            if snapshot.status.is_alarm()
                && in_alarm.insert(snapshot.device_id.clone())
                && !self.in_alarm.contains(&snapshot.device_id)
            {
                let notice = AlarmNotice::live(snapshot, now);
                tracing::warn!(
                    device_id = %notice.device_id,
                    location = %notice.location,
                    "device_entered_alarm"
                );
                self.alarms.record(notice.clone());
                raised.push(notice);
            }
            self.devices
                .insert(snapshot.device_id.clone(), snapshot.clone());
        }

        self.in_alarm = in_alarm;
        self.overview = overview;
        self.last_batch_at = Some(now);

        BatchOutcome {
            sample,
            overview,
            raised,
        }
    }

    /// Load past alarms without raising notifications.
    pub fn seed_history(&mut self, notices: impl IntoIterator<Item = AlarmNotice>) {
        self.alarms.extend_sorted(notices);
        tracing::debug!(logged = self.alarms.len(), "alarm_history_seeded");
    }

    #[must_use]
    pub fn aggregator(&self) -> &SensorSeriesAggregator {
        &self.aggregator
    }

    /// Latest snapshot per device, ordered by device id.
    #[must_use]
    pub fn devices(&self) -> Vec<DeviceSnapshot> {
        self.devices.values().cloned().collect()
    }

    #[must_use]
    pub fn device(&self, device_id: &str) -> Option<DeviceSnapshot> {
        self.devices.get(device_id).cloned()
    }

    #[must_use]
    pub fn overview(&self) -> StatusOverview {
        self.overview
    }

    /// Up to `limit` alarm notices, newest first.
    #[must_use]
    pub fn alarm_log(&self, limit: usize) -> Vec<AlarmNotice> {
        self.alarms.recent(limit)
    }

    /// Alarms raised on `date` in `tz`, for the "today" counter.
    #[must_use]
    pub fn alarms_on<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> usize {
        self.alarms.count_on(date, tz)
    }

    #[must_use]
    pub fn last_batch_at(&self) -> Option<DateTime<Utc>> {
        self.last_batch_at
    }
}
