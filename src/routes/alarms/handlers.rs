use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::{Stream, StreamExt};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;

use crate::common::AppState;
use crate::monitor::alarms::DEFAULT_ALARM_LIMIT;

use super::types::{AlarmResponse, AlarmsQuery};

/// List recent alarm notices, newest first
///
/// Includes notices raised live by this service and those loaded from the
/// upstream alarm history at startup.
#[utoipa::path(
    get,
    path = "/api/alarms",
    params(AlarmsQuery),
    responses(
        (status = 200, description = "Alarms retrieved successfully", body = Vec<AlarmResponse>),
    ),
    tag = "alarms"
)]
pub async fn list_alarms(
    State(state): State<AppState>,
    Query(query): Query<AlarmsQuery>,
) -> Json<Vec<AlarmResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_ALARM_LIMIT);
    let notices = state.dashboard.read().await.alarm_log(limit);
    Json(notices.into_iter().map(AlarmResponse::from).collect())
}

/// Stream alarm notices as server-sent events
///
/// Each event is named `alarm` and carries one notice as JSON. Only notices
/// raised after the subscription are delivered; a slow client skips notices
/// it fell behind on.
#[utoipa::path(
    get,
    path = "/api/alarms/stream",
    responses(
        (status = 200, description = "Event stream of alarm notices", body = String, content_type = "text/event-stream"),
    ),
    tag = "alarms"
)]
pub async fn alarm_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.alarm_tx.subscribe();
    tracing::debug!(subscribers = state.alarm_tx.receiver_count(), "Alarm stream opened");

    let stream = BroadcastStream::new(rx)
        .filter_map(|notice| async move { notice.ok() })
        .map(|notice| {
            let payload = AlarmResponse::from(notice);
            let event = Event::default()
                .event("alarm")
                .json_data(&payload)
                .unwrap_or_else(|_| Event::default().event("alarm").data("{}"));
            Ok(event)
        });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
