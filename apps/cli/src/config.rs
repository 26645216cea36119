//! Environment-driven configuration.

use std::time::Duration;

use qrpass_connect::DEFAULT_API_URL;
use qrpass_core::constants::{QR_REFRESH_INTERVAL, QR_RETRY_INTERVAL};
use qrpass_core::errors::{Error, Result};
use qrpass_core::qr::ControllerConfig;
use qrpass_core::Locale;

pub const ENV_API_URL: &str = "QRPASS_API_URL";
pub const ENV_ACCESS_TOKEN: &str = "QRPASS_ACCESS_TOKEN";
pub const ENV_DB_PATH: &str = "QRPASS_DB_PATH";
pub const ENV_LOG_FORMAT: &str = "QRPASS_LOG_FORMAT";
pub const ENV_REFRESH_INTERVAL: &str = "QRPASS_REFRESH_INTERVAL_SECS";
pub const ENV_RETRY_INTERVAL: &str = "QRPASS_RETRY_INTERVAL_SECS";
pub const ENV_LOCALE: &str = "QRPASS_LOCALE";

const DEFAULT_DB_PATH: &str = "./qrpass.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub access_token: Option<String>,
    pub db_path: String,
    pub log_format: LogFormat,
    pub refresh_interval: Duration,
    pub retry_interval: Duration,
    pub locale: Locale,
}

impl Config {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let log_format = match get(ENV_LOG_FORMAT) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(v) if v.eq_ignore_ascii_case("text") => LogFormat::Text,
            Some(v) => {
                return Err(Error::InvalidConfigValue(format!(
                    "{} must be 'text' or 'json', got '{}'",
                    ENV_LOG_FORMAT, v
                )))
            }
            None => LogFormat::Text,
        };

        let locale = match get(ENV_LOCALE) {
            Some(v) => v.parse::<Locale>()?,
            None => Locale::default(),
        };

        Ok(Config {
            api_url: get(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            access_token: get(ENV_ACCESS_TOKEN),
            db_path: get(ENV_DB_PATH).unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            log_format,
            refresh_interval: parse_interval(ENV_REFRESH_INTERVAL, get(ENV_REFRESH_INTERVAL))?
                .unwrap_or(QR_REFRESH_INTERVAL),
            retry_interval: parse_interval(ENV_RETRY_INTERVAL, get(ENV_RETRY_INTERVAL))?
                .unwrap_or(QR_RETRY_INTERVAL),
            locale,
        })
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            refresh_interval: self.refresh_interval,
            retry_interval: self.retry_interval,
        }
    }
}

/// Whole seconds, at least one.
fn parse_interval(key: &str, value: Option<String>) -> Result<Option<Duration>> {
    let Some(raw) = value else {
        return Ok(None);
    };
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
        _ => Err(Error::InvalidConfigValue(format!(
            "{} must be a positive number of seconds, got '{}'",
            key, raw
        ))),
    }
}
