use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::config::Config;
use crate::error::AppResult;
use crate::monitor::{AlarmNotice, BatchOutcome, DashboardMonitor};
use crate::series::DeviceSnapshot;
use crate::upstream::UpstreamClient;

/// Buffered notices per SSE subscriber before it starts lagging.
const ALARM_CHANNEL_CAPACITY: usize = 64;

/// Health of the upstream polling loop.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PollStatus {
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_error_at: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
}

impl PollStatus {
    pub fn record_success(&mut self, at: DateTime<Utc>) {
        self.last_success = Some(at);
        self.consecutive_failures = 0;
    }

    pub fn record_failure(&mut self, error: String, at: DateTime<Utc>) {
        self.last_error = Some(error);
        self.last_error_at = Some(at);
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub upstream: Arc<UpstreamClient>,
    /// Single writer at a time; readers never see a half-applied batch
    pub dashboard: Arc<RwLock<DashboardMonitor>>,
    pub poll_status: Arc<RwLock<PollStatus>>,
    pub alarm_tx: broadcast::Sender<AlarmNotice>,
}

impl AppState {
    /// # Errors
    ///
    /// Returns an error if the window capacity is zero or the upstream HTTP
    /// client cannot be built.
    pub fn new(config: Config) -> AppResult<Self> {
        let dashboard = DashboardMonitor::new(config.window_capacity, config.alarm_history_limit)?;
        let upstream = UpstreamClient::new(&config)?;
        let (alarm_tx, _) = broadcast::channel(ALARM_CHANNEL_CAPACITY);

        Ok(Self {
            config: Arc::new(config),
            upstream: Arc::new(upstream),
            dashboard: Arc::new(RwLock::new(dashboard)),
            poll_status: Arc::new(RwLock::new(PollStatus::default())),
            alarm_tx,
        })
    }

    /// Apply a batch from any data source and fan out new alarm notices.
    pub async fn apply_batch(&self, snapshots: &[DeviceSnapshot], label: String) -> BatchOutcome {
        let outcome = {
            let mut dashboard = self.dashboard.write().await;
            dashboard.apply_batch(snapshots, label, Utc::now())
        };

        for notice in &outcome.raised {
            // No subscribers is fine; the notice is already in the log
            let _ = self.alarm_tx.send(notice.clone());
        }
        outcome
    }
}
