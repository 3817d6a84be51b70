use chrono::Local;

use crate::common::{time_label, AppState};
use crate::error::AppResult;
use crate::monitor::BatchOutcome;
use crate::upstream::models::HistoryEntry;

/// Fetch the current device list from upstream and apply it as one batch.
///
/// An empty device list adds no chart point: the upstream server only lists
/// devices that have reported data, so an empty list means nothing to plot
/// yet rather than a zero reading.
///
/// # Errors
///
/// Returns an error if the upstream request fails.
pub async fn poll_devices(state: &AppState) -> AppResult<Option<BatchOutcome>> {
    let devices = state.upstream.get_devices().await?.into_inner();

    if devices.is_empty() {
        tracing::debug!("Upstream reported no devices, skipping chart point");
        return Ok(None);
    }

    let outcome = state.apply_batch(&devices, time_label(Local::now())).await;

    tracing::debug!(
        devices = devices.len(),
        contributors = outcome.sample.contributors,
        alarm = outcome.overview.alarm,
        raised = outcome.raised.len(),
        "Device poll applied"
    );

    Ok(Some(outcome))
}

/// Load the upstream alarm history into the alarm log.
///
/// # Errors
///
/// Returns an error if the upstream request fails.
pub async fn seed_alarm_history(state: &AppState) -> AppResult<usize> {
    let history = state.upstream.get_alarm_history().await?;
    let total = history.len();

    let notices: Vec<_> = history
        .into_iter()
        .filter_map(HistoryEntry::into_notice)
        .collect();
    let loaded = notices.len();

    if loaded < total {
        tracing::warn!(
            skipped = total - loaded,
            "Skipped alarm history entries without a timestamp"
        );
    }

    state.dashboard.write().await.seed_history(notices);
    Ok(loaded)
}
