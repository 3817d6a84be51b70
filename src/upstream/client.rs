use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::upstream::models::{DevicesResponse, HistoryResponse};

/// REST client for the upstream fire-alarm server.
pub struct UpstreamClient {
    http_client: Client,
    base_url: String,
}

impl UpstreamClient {
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the HTTP client cannot be built.
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.upstream_base_url.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the latest snapshot of every device that has reported data.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Upstream` if the request fails, returns an error
    /// status, or the body is not a JSON array.
    pub async fn get_devices(&self) -> AppResult<DevicesResponse> {
        self.get_json("/api/devices").await
    }

    /// Get alarms raised by the upstream server in the last 24 hours.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Upstream` if the request fails, returns an error
    /// status, or the body is not a JSON array.
    pub async fn get_alarm_history(&self) -> AppResult<HistoryResponse> {
        self.get_json("/api/history").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let url = format!("{}{path}", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::Upstream("Rate limited (429)".to_string()));
        }

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to get response text: {e}")))?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                path,
                body_preview = %text.chars().take(500).collect::<String>(),
                "Failed to parse upstream response"
            );
            AppError::Upstream(format!("Failed to parse response: {e}"))
        })
    }
}
