use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::monitor::{AlarmNotice, AlarmSource};

/// Alarm notice response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AlarmResponse {
    pub id: Uuid,
    pub device_id: String,
    pub location: String,
    pub temperature: Option<f64>,
    pub smoke_level: Option<f64>,
    pub message: String,
    pub raised_at: DateTime<Utc>,
    /// live or history
    pub source: String,
}

impl From<AlarmNotice> for AlarmResponse {
    fn from(n: AlarmNotice) -> Self {
        let source = match n.source {
            AlarmSource::Live => "live",
            AlarmSource::History => "history",
        };
        Self {
            id: n.id,
            device_id: n.device_id,
            location: n.location,
            temperature: n.temperature,
            smoke_level: n.smoke_level,
            message: n.message,
            raised_at: n.raised_at,
            source: source.to_string(),
        }
    }
}

/// Query parameters for the alarm log endpoint
#[derive(Debug, Deserialize, IntoParams)]
pub struct AlarmsQuery {
    /// Maximum notices to return, newest first (default 50)
    pub limit: Option<usize>,
}
