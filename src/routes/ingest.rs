use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::common::{time_label, AppState};
use crate::routes::alarms::types::AlarmResponse;
use crate::routes::chart::SampleResponse;
use crate::routes::devices::DeviceResponse;
use crate::series::DeviceBatch;

#[derive(Debug, Deserialize, IntoParams)]
pub struct IngestQuery {
    /// Chart label for the batch; defaults to the local time of arrival
    pub label: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IngestResponse {
    /// Sample appended to the chart window
    pub sample: SampleResponse,
    /// Snapshots received in the batch
    pub received: usize,
    /// Alarm notices raised by this batch
    pub raised: Vec<AlarmResponse>,
}

/// Push a batch of device snapshots
///
/// Accepts the same JSON shape as the upstream `/api/devices` endpoint. Bad
/// readings are tolerated and excluded from the averages, and array entries
/// that are not objects are skipped. Every call
/// appends one point to the chart window, even for an empty batch.
#[utoipa::path(
    post,
    path = "/api/snapshots",
    params(IngestQuery),
    request_body = Vec<DeviceResponse>,
    responses(
        (status = 200, description = "Batch applied", body = IngestResponse),
        (status = 400, description = "Body is not valid JSON"),
        (status = 422, description = "Body is not a JSON array"),
        (status = 429, description = "Too many batches from this source"),
    ),
    tag = "ingest"
)]
pub async fn post_snapshots(
    State(state): State<AppState>,
    Query(query): Query<IngestQuery>,
    Json(batch): Json<DeviceBatch>,
) -> Json<IngestResponse> {
    let snapshots = batch.into_inner();
    let label = query
        .label
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| time_label(Local::now()));

    let outcome = state.apply_batch(&snapshots, label).await;

    tracing::debug!(
        received = snapshots.len(),
        contributors = outcome.sample.contributors,
        raised = outcome.raised.len(),
        "Pushed batch applied"
    );

    Json(IngestResponse {
        sample: outcome.sample.into(),
        received: snapshots.len(),
        raised: outcome.raised.into_iter().map(AlarmResponse::from).collect(),
    })
}
