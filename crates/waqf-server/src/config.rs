//! Server configuration
//!
//! Values come from the Shuttle secret store (`Secrets.toml`). Lookup is
//! abstracted behind a closure so the parsing can be tested without Shuttle.

use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_KPI_STALE_SECS: u64 = 300;
pub const DEFAULT_REALTIME_CHANNEL: &str = "waqf_changes";
pub const DEFAULT_ERROR_LOG_CAPACITY: usize = 100;
pub const DEFAULT_STATUS_SWEEP_SECS: u64 = 3600;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HS256 secret shared with the auth service; `None` disables authentication
    pub jwt_secret: Option<String>,
    pub kpi_stale_secs: u64,
    pub realtime_channel: String,
    pub edge_functions_url: Option<String>,
    pub edge_functions_key: Option<String>,
    pub notify_signing_secret: Option<String>,
    pub error_log_capacity: usize,
    /// Seconds between status sweeps; `0` disables them
    pub status_sweep_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            kpi_stale_secs: DEFAULT_KPI_STALE_SECS,
            realtime_channel: DEFAULT_REALTIME_CHANNEL.to_string(),
            edge_functions_url: None,
            edge_functions_key: None,
            notify_signing_secret: None,
            error_log_capacity: DEFAULT_ERROR_LOG_CAPACITY,
            status_sweep_secs: DEFAULT_STATUS_SWEEP_SECS,
        }
    }
}

impl ServerConfig {
    pub fn from_secrets(secrets: &shuttle_runtime::SecretStore) -> Self {
        Self::from_lookup(|key| secrets.get(key))
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            jwt_secret: get("WAQF_JWT_SECRET"),
            kpi_stale_secs: parse_or(get("KPI_STALE_SECS"), "KPI_STALE_SECS", DEFAULT_KPI_STALE_SECS),
            realtime_channel: get("REALTIME_CHANNEL")
                .unwrap_or_else(|| DEFAULT_REALTIME_CHANNEL.to_string()),
            edge_functions_url: get("EDGE_FUNCTIONS_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            edge_functions_key: get("EDGE_FUNCTIONS_KEY"),
            notify_signing_secret: get("NOTIFY_SIGNING_SECRET"),
            error_log_capacity: parse_or(
                get("ERROR_LOG_CAPACITY"),
                "ERROR_LOG_CAPACITY",
                DEFAULT_ERROR_LOG_CAPACITY,
            ),
            status_sweep_secs: parse_or(
                get("STATUS_SWEEP_SECS"),
                "STATUS_SWEEP_SECS",
                DEFAULT_STATUS_SWEEP_SECS,
            ),
        }
    }

    pub fn kpi_stale_after(&self) -> Duration {
        Duration::from_secs(self.kpi_stale_secs)
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(raw: Option<String>, key: &str, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("⚠️  {key}={raw:?} is not a valid number, using {default}");
            default
        }),
    }
}
