use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::routes::chart::SampleResponse;
use crate::series::{DeviceSnapshot, DeviceStatus};

/// Latest reading of one device
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeviceResponse {
    pub device_id: String,
    pub location: Option<String>,
    pub temperature: Option<f64>,
    pub smoke_level: Option<f64>,
    /// Raw flame reading; lower means stronger flame
    pub flame: Option<f64>,
    pub humidity: Option<f64>,
    pub light_level: Option<f64>,
    /// normal, warning, alarm or unknown
    pub status: String,
    pub last_update_epoch_seconds: Option<i64>,
}

fn status_name(status: DeviceStatus) -> &'static str {
    match status {
        DeviceStatus::Normal => "normal",
        DeviceStatus::Warning => "warning",
        DeviceStatus::Alarm => "alarm",
        DeviceStatus::Unknown => "unknown",
    }
}

impl From<DeviceSnapshot> for DeviceResponse {
    fn from(d: DeviceSnapshot) -> Self {
        // Non-finite readings cannot be represented in JSON
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
        Self {
            status: status_name(d.status).to_string(),
            device_id: d.device_id,
            location: d.location,
            temperature: finite(d.temperature),
            smoke_level: finite(d.smoke_level),
            flame: finite(d.flame),
            humidity: finite(d.humidity),
            light_level: finite(d.light_level),
            last_update_epoch_seconds: d.last_update_epoch_seconds,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OverviewResponse {
    pub total: usize,
    pub normal: usize,
    pub warning: usize,
    pub alarm: usize,
    pub unknown: usize,
    /// True while at least one device is in alarm
    pub alarm_active: bool,
    /// Alarms raised today, local time
    pub today_alarms: usize,
    /// Most recent aggregated sample
    pub latest: Option<SampleResponse>,
    pub last_batch_at: Option<DateTime<Utc>>,
}

/// List the latest reading of every device
#[utoipa::path(
    get,
    path = "/api/devices",
    responses(
        (status = 200, description = "Devices retrieved successfully", body = Vec<DeviceResponse>),
    ),
    tag = "devices"
)]
pub async fn list_devices(State(state): State<AppState>) -> Json<Vec<DeviceResponse>> {
    let devices = state.dashboard.read().await.devices();
    Json(devices.into_iter().map(DeviceResponse::from).collect())
}

/// Get the latest reading of one device
#[utoipa::path(
    get,
    path = "/api/devices/{device_id}",
    params(
        ("device_id" = String, Path, description = "Device identifier"),
    ),
    responses(
        (status = 200, description = "Device retrieved successfully", body = DeviceResponse),
        (status = 404, description = "Device not found"),
    ),
    tag = "devices"
)]
pub async fn get_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> AppResult<Json<DeviceResponse>> {
    state
        .dashboard
        .read()
        .await
        .device(&device_id)
        .map(|d| Json(d.into()))
        .ok_or_else(|| AppError::NotFound(format!("Device '{device_id}' not found")))
}

/// Status overview of the latest batch
#[utoipa::path(
    get,
    path = "/api/overview",
    responses(
        (status = 200, description = "Overview retrieved successfully", body = OverviewResponse),
    ),
    tag = "devices"
)]
pub async fn get_overview(State(state): State<AppState>) -> Json<OverviewResponse> {
    let dashboard = state.dashboard.read().await;
    let overview = dashboard.overview();
    let today = Local::now().date_naive();

    Json(OverviewResponse {
        total: overview.total,
        normal: overview.normal,
        warning: overview.warning,
        alarm: overview.alarm,
        unknown: overview.unknown,
        alarm_active: overview.alarm_active(),
        today_alarms: dashboard.alarms_on(today, &Local),
        latest: dashboard.aggregator().latest().map(SampleResponse::from),
        last_batch_at: dashboard.last_batch_at(),
    })
}
