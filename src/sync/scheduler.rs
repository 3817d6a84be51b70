use chrono::Utc;
use std::time::Duration;
use tokio::time::interval;

use crate::common::AppState;
use crate::sync::worker;

/// Longest wait between retries after upstream rate limiting.
pub const MAX_RATE_LIMIT_BACKOFF_SECS: u64 = 300;

/// Delay before retry number `attempt` (starting at 1).
///
/// Ordinary failures retry after a fixed `base_secs`. A rate-limited
/// upstream gets exponential backoff, doubling per attempt up to
/// `MAX_RATE_LIMIT_BACKOFF_SECS`.
#[must_use]
pub fn retry_delay(base_secs: u64, attempt: u32, rate_limited: bool) -> Duration {
    if !rate_limited {
        return Duration::from_secs(base_secs);
    }
    let backoff = base_secs
        .saturating_mul(2u64.saturating_pow(attempt))
        .min(MAX_RATE_LIMIT_BACKOFF_SECS)
        .max(base_secs);
    Duration::from_secs(backoff)
}

/// Run the device poll task on a schedule.
///
/// On startup, first loads the upstream alarm history, then polls the device
/// list every interval and feeds each batch into the dashboard.
pub async fn run_device_poll(state: AppState) {
    let interval_secs = state.config.poll_interval_seconds;
    let retry_delay_secs = state.config.poll_retry_delay_seconds;
    let max_retries = state.config.poll_retry_max;

    tracing::info!(
        interval_secs,
        upstream = %state.upstream.base_url(),
        "Starting device poll scheduler"
    );

    match worker::seed_alarm_history(&state).await {
        Ok(loaded) => tracing::info!(loaded, "Alarm history loaded"),
        Err(e) => tracing::error!(error = %e, "Failed to load alarm history from upstream"),
    }

    let mut ticker = interval(Duration::from_secs(interval_secs));

    // Run initial poll immediately
    ticker.tick().await;

    loop {
        tracing::debug!("Polling upstream devices...");

        let mut retries = 0;
        loop {
            match worker::poll_devices(&state).await {
                Ok(_) => {
                    state.poll_status.write().await.record_success(Utc::now());
                    break;
                }
                Err(e) => {
                    state
                        .poll_status
                        .write()
                        .await
                        .record_failure(e.to_string(), Utc::now());

                    retries += 1;
                    if retries > max_retries {
                        tracing::error!(
                            error = %e,
                            max_retries,
                            "Device poll failed after max retries"
                        );
                        break;
                    }

                    let rate_limited = e.is_rate_limited();
                    let delay = retry_delay(retry_delay_secs, retries, rate_limited);
                    if rate_limited {
                        tracing::warn!(
                            retry = retries,
                            max_retries,
                            delay_secs = delay.as_secs(),
                            "Device poll rate limited, backing off"
                        );
                    } else {
                        tracing::error!(
                            error = %e,
                            retry = retries,
                            max_retries,
                            delay_secs = delay.as_secs(),
                            "Device poll failed, retrying"
                        );
                    }
                    tokio::time::sleep(delay).await;
                }
            }
        }

        // Wait for next tick
        ticker.tick().await;
    }
}
