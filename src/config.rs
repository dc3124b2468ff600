// src/config.rs - Runtime configuration read from the environment
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::errors::ConfigError;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;
pub const DEFAULT_USER_ID: i64 = 1;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_FILE: &str = "trade_dashboard.log";

const BASE_URL_KEY: &str = "TRADE_API_BASE_URL";

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend root, without trailing slash.
    pub api_base_url: String,
    pub poll_interval: Duration,
    /// Placeholder identity sent with every new trade; there is no login.
    pub user_id: i64,
    pub request_timeout: Duration,
    pub log_file: PathBuf,
}

impl DashboardConfig {
    /// Reads the process environment. A command-line base URL, when given,
    /// takes the place of TRADE_API_BASE_URL, set or not.
    pub fn from_env(api_url: Option<&str>) -> Result<Self, ConfigError> {
        Self::from_lookup(prefer_base_url(api_url, |key| std::env::var(key).ok()))
    }

    /// Builds the config from any key lookup. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup(BASE_URL_KEY)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?;
        let api_base_url = normalize_base_url(&raw_url)?;

        let poll_ms = parse_number(&lookup, "POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?;
        if poll_ms == 0 {
            return Err(ConfigError::InvalidNumber {
                key: "POLL_INTERVAL_MS",
                value: "0".to_string(),
            });
        }

        let user_id = parse_number(&lookup, "TRADE_USER_ID", DEFAULT_USER_ID)?;
        let timeout_secs =
            parse_number(&lookup, "REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        let log_file = lookup("DASHBOARD_LOG_FILE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

        Ok(Self {
            api_base_url,
            poll_interval: Duration::from_millis(poll_ms),
            user_id,
            request_timeout: Duration::from_secs(timeout_secs),
            log_file: PathBuf::from(log_file),
        })
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(
        mut self,
        api_url: Option<&str>,
        interval_ms: Option<u64>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = api_url {
            self.api_base_url = normalize_base_url(url)?;
        }
        if let Some(ms) = interval_ms {
            if ms == 0 {
                return Err(ConfigError::InvalidNumber {
                    key: "--interval-ms",
                    value: ms.to_string(),
                });
            }
            self.poll_interval = Duration::from_millis(ms);
        }
        Ok(self)
    }
}

/// Wraps a lookup so `api_url`, when set, answers for TRADE_API_BASE_URL.
pub fn prefer_base_url<F>(api_url: Option<&str>, lookup: F) -> impl Fn(&str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let api_url = api_url.map(str::to_string);
    move |key| match &api_url {
        Some(url) if key == BASE_URL_KEY => Some(url.clone()),
        _ => lookup(key),
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        source,
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::UnsupportedScheme(raw.to_string()));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

fn parse_number<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        _ => Ok(default),
    }
}
