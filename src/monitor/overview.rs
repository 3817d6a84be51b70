use serde::Serialize;

use crate::series::{DeviceSnapshot, DeviceStatus};

/// Device counts per status for the latest batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusOverview {
    pub total: usize,
    pub normal: usize,
    pub warning: usize,
    pub alarm: usize,
    /// Devices whose status label was not recognised
    pub unknown: usize,
}

impl StatusOverview {
    #[must_use]
    pub fn from_snapshots(snapshots: &[DeviceSnapshot]) -> Self {
        let mut overview = Self {
            total: snapshots.len(),
            ..Self::default()
        };
        for snapshot in snapshots {
            match snapshot.status {
                DeviceStatus::Normal => overview.normal += 1,
                DeviceStatus::Warning => overview.warning += 1,
                DeviceStatus::Alarm => overview.alarm += 1,
                DeviceStatus::Unknown => overview.unknown += 1,
            }
        }
        overview
    }

    #[must_use]
    pub const fn alarm_active(&self) -> bool {
        self.alarm > 0
    }
}
