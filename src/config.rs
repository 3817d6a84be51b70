use std::env;

use crate::monitor::alarms::DEFAULT_ALARM_LIMIT;
use crate::series::window::DEFAULT_CAPACITY;

#[derive(Debug, Clone)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Upstream fire-alarm server
    pub upstream_base_url: String,
    pub upstream_timeout_seconds: u64,

    // Polling
    pub poll_interval_seconds: u64,
    pub poll_retry_max: u32,
    pub poll_retry_delay_seconds: u64,

    // Dashboard state
    pub window_capacity: usize,
    pub alarm_history_limit: usize,

    // API settings
    pub api_host: String,
    pub api_port: u16,

    // Rate limiting for pushed batches
    pub disable_rate_limiting: bool,
    pub rate_limit_ingest_per_second: u64,
    pub rate_limit_ingest_burst: u32,
    /// Key push buckets on `X-Source-Id`; only safe behind a gateway that sets it
    pub trust_source_id_header: bool,

    // Application metadata
    pub log_format: LogFormat,
    pub deployment: Deployment,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream_base_url: "http://127.0.0.1:5000".to_string(),
            upstream_timeout_seconds: 10,
            poll_interval_seconds: 10,
            poll_retry_max: 3,
            poll_retry_delay_seconds: 5,
            window_capacity: DEFAULT_CAPACITY.get(),
            alarm_history_limit: DEFAULT_ALARM_LIMIT,
            api_host: "0.0.0.0".to_string(),
            api_port: 3000,
            disable_rate_limiting: false,
            rate_limit_ingest_per_second: 1,
            rate_limit_ingest_burst: 10,
            trust_source_id_header: false,
            log_format: LogFormat::Pretty,
            deployment: Deployment::Local,
        }
    }
}

/// Parse an optional variable, falling back to `default` when unset or malformed.
fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every setting has a default. Malformed numbers fall back to the
    /// default, except `WINDOW_CAPACITY`, which must be a positive integer.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `WINDOW_CAPACITY` is zero or not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let window_capacity = match env::var("WINDOW_CAPACITY") {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "WINDOW_CAPACITY",
                        value: raw,
                    });
                }
            },
            Err(_) => defaults.window_capacity,
        };

        Ok(Self {
            // Upstream fire-alarm server
            upstream_base_url: env::var("UPSTREAM_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.upstream_base_url),
            upstream_timeout_seconds: parse_or(
                "UPSTREAM_TIMEOUT_SECONDS",
                defaults.upstream_timeout_seconds,
            ),

            // Polling
            poll_interval_seconds: parse_or("POLL_INTERVAL_SECONDS", defaults.poll_interval_seconds)
                .max(1),
            poll_retry_max: parse_or("POLL_RETRY_MAX", defaults.poll_retry_max),
            poll_retry_delay_seconds: parse_or(
                "POLL_RETRY_DELAY_SECONDS",
                defaults.poll_retry_delay_seconds,
            ),

            // Dashboard state
            window_capacity,
            alarm_history_limit: parse_or("ALARM_HISTORY_LIMIT", defaults.alarm_history_limit),

            // API settings
            api_host: env::var("API_HOST").unwrap_or(defaults.api_host),
            api_port: parse_or("API_PORT", defaults.api_port),

            // Rate limiting
            disable_rate_limiting: parse_or(
                "DISABLE_RATE_LIMITING",
                defaults.disable_rate_limiting,
            ),
            rate_limit_ingest_per_second: parse_or(
                "RATE_LIMIT_INGEST_PER_SECOND",
                defaults.rate_limit_ingest_per_second,
            ),
            rate_limit_ingest_burst: parse_or(
                "RATE_LIMIT_INGEST_BURST",
                defaults.rate_limit_ingest_burst,
            ),
            trust_source_id_header: parse_or(
                "TRUST_SOURCE_ID_HEADER",
                defaults.trust_source_id_header,
            ),

            // Application metadata
            log_format: LogFormat::from_str(&env::var("LOG_FORMAT").unwrap_or_default()),
            deployment: Deployment::from_str(
                &env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            ),
        })
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
