use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::AppState;

/// Health check endpoint
///
/// Returns 200 OK if the service is running, whether or not the upstream
/// server is reachable.
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "health"
)]
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    /// Upstream fire-alarm server base URL
    pub upstream: String,
    /// Whether the last poll attempt succeeded
    pub upstream_ok: bool,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_error_at: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    /// Time the last batch was applied, from any source
    pub last_batch_at: Option<DateTime<Utc>>,
    pub window_len: usize,
    pub window_capacity: usize,
}

/// Connection status
///
/// Reports upstream reachability and how full the chart window is.
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Status retrieved successfully", body = StatusResponse),
    ),
    tag = "health"
)]
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let poll = state.poll_status.read().await.clone();
    let (last_batch_at, window_len, window_capacity) = {
        let dashboard = state.dashboard.read().await;
        (
            dashboard.last_batch_at(),
            dashboard.aggregator().len(),
            dashboard.aggregator().capacity(),
        )
    };

    let upstream_ok = match (poll.last_success, poll.last_error_at) {
        (Some(ok), Some(err)) => ok >= err,
        (Some(_), None) => true,
        _ => false,
    };

    Json(StatusResponse {
        upstream: state.upstream.base_url().to_string(),
        upstream_ok,
        last_success: poll.last_success,
        last_error: poll.last_error,
        last_error_at: poll.last_error_at,
        consecutive_failures: poll.consecutive_failures,
        last_batch_at,
        window_len,
        window_capacity,
    })
}
