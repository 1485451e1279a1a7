//! Environment-driven configuration.
//!
//! [`ServerConfig`] covers the HTTP listener, [`GameConfig`] everything the
//! draw engine needs. Both read the process environment once at startup;
//! an invalid value is a [`ConfigError`] and the binary exits.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use chrono::{FixedOffset, NaiveTime, TimeDelta};
use lucky_core::window::{parse_reset_time, parse_utc_offset, WindowPolicy, WindowZone};
use lucky_engine::ServiceConfig;

/// Longest accepted reset ticket lifetime (one day).
const MAX_RESET_TTL_SECS: u64 = 86_400;

/// A configuration variable with an unusable value.
#[derive(Debug, thiserror::Error)]
#[error("{var} has invalid value '{value}': {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Read `var`, falling back to `default` when unset, and parse it.
fn parse_var<T>(var: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    raw.trim().parse().map_err(|e: T::Err| ConfigError {
        var,
        value: raw.clone(),
        reason: e.to_string(),
    })
}

/// Read `var`; unset or blank is `None`.
fn optional_var(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = parse_var("PORT", "3000")?;

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            HeaderValue::from_str(origin).map_err(|e| ConfigError {
                var: "CORS_ORIGINS",
                value: origin.clone(),
                reason: e.to_string(),
            })?;
        }

        let request_timeout_secs: u64 = parse_var("REQUEST_TIMEOUT_SECS", "30")?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
        })
    }
}

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Draw engine configuration.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// File backing the key-value store.
    pub store_path: PathBuf,
    /// Prize table file; `None` uses the built-in table.
    pub prize_table_path: Option<PathBuf>,
    /// Ledger endpoint; `None` disables sync.
    pub ledger_url: Option<String>,
    pub ledger_timeout_secs: u64,
    /// Local wall-clock time at which a new window opens.
    pub window_reset_time: NaiveTime,
    /// Fixed zone for the window boundary; `None` follows the host.
    pub window_utc_offset: Option<FixedOffset>,
    pub eligibility_check_secs: u64,
    pub reveal_settle_ms: u64,
    pub reset_confirm_ttl_secs: u64,
}

impl GameConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                   |
    /// |--------------------------|---------------------------|
    /// | `STORE_PATH`             | `data/lucky-scratch.json` |
    /// | `PRIZE_TABLE_PATH`       | unset (built-in table)    |
    /// | `LEDGER_URL`             | unset (sync disabled)     |
    /// | `LEDGER_TIMEOUT_SECS`    | `10`                      |
    /// | `WINDOW_RESET_TIME`      | `10:00`                   |
    /// | `WINDOW_UTC_OFFSET`      | unset (host local time)   |
    /// | `ELIGIBILITY_CHECK_SECS` | `60`                      |
    /// | `REVEAL_SETTLE_MS`       | `500`                     |
    /// | `RESET_CONFIRM_TTL_SECS` | `120`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        let store_path = PathBuf::from(
            std::env::var("STORE_PATH").unwrap_or_else(|_| "data/lucky-scratch.json".into()),
        );
        let prize_table_path = optional_var("PRIZE_TABLE_PATH").map(PathBuf::from);
        let ledger_url = optional_var("LEDGER_URL");
        let ledger_timeout_secs: u64 = parse_var("LEDGER_TIMEOUT_SECS", "10")?;

        let raw_reset = std::env::var("WINDOW_RESET_TIME").unwrap_or_else(|_| "10:00".into());
        let window_reset_time = parse_reset_time(&raw_reset).map_err(|e| ConfigError {
            var: "WINDOW_RESET_TIME",
            value: raw_reset.clone(),
            reason: e.to_string(),
        })?;

        let window_utc_offset = optional_var("WINDOW_UTC_OFFSET")
            .map(|raw| {
                parse_utc_offset(&raw).map_err(|e| ConfigError {
                    var: "WINDOW_UTC_OFFSET",
                    value: raw.clone(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let eligibility_check_secs: u64 = parse_var("ELIGIBILITY_CHECK_SECS", "60")?;
        if eligibility_check_secs == 0 {
            return Err(ConfigError {
                var: "ELIGIBILITY_CHECK_SECS",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }
        let reveal_settle_ms: u64 = parse_var("REVEAL_SETTLE_MS", "500")?;
        let reset_confirm_ttl_secs: u64 = parse_var("RESET_CONFIRM_TTL_SECS", "120")?;
        if reset_confirm_ttl_secs > MAX_RESET_TTL_SECS {
            return Err(ConfigError {
                var: "RESET_CONFIRM_TTL_SECS",
                value: reset_confirm_ttl_secs.to_string(),
                reason: format!("must be at most {MAX_RESET_TTL_SECS}"),
            });
        }

        Ok(Self {
            store_path,
            prize_table_path,
            ledger_url,
            ledger_timeout_secs,
            window_reset_time,
            window_utc_offset,
            eligibility_check_secs,
            reveal_settle_ms,
            reset_confirm_ttl_secs,
        })
    }

    pub fn window_policy(&self) -> WindowPolicy {
        let zone = match self.window_utc_offset {
            Some(offset) => WindowZone::Fixed(offset),
            None => WindowZone::Local,
        };
        WindowPolicy::new(self.window_reset_time, zone)
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            settle_delay: Duration::from_millis(self.reveal_settle_ms),
            eligibility_interval: Duration::from_secs(self.eligibility_check_secs),
        }
    }

    pub fn reset_ttl(&self) -> TimeDelta {
        let secs = self.reset_confirm_ttl_secs.min(MAX_RESET_TTL_SECS);
        TimeDelta::seconds(secs as i64)
    }

    pub fn ledger_timeout(&self) -> Duration {
        Duration::from_secs(self.ledger_timeout_secs)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("data/lucky-scratch.json"),
            prize_table_path: None,
            ledger_url: None,
            ledger_timeout_secs: 10,
            window_reset_time: WindowPolicy::default().reset_at(),
            window_utc_offset: None,
            eligibility_check_secs: 60,
            reveal_settle_ms: 500,
            reset_confirm_ttl_secs: 120,
        }
    }
}
