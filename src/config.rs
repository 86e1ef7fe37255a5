//! Environment-based application configuration.
//!
//! Values are read once at startup after `dotenvy` has loaded any `.env` file. Only the
//! bot token is required; every antinuke tuning knob falls back to a default.

use std::time::Duration;

use dioxus_logger::tracing::Level;

use crate::error::{config::ConfigError, AppError};

const DEFAULT_COMMAND_PREFIX: &str = "!";
const DEFAULT_AUDIT_LOOKBACK: u8 = 1;
const DEFAULT_AUDIT_ATTEMPTS: u32 = 3;
const DEFAULT_AUDIT_BACKOFF_MS: u64 = 500;
const DEFAULT_PLATFORM_TIMEOUT_SECS: u64 = 10;
const DEFAULT_AUDIT_MAX_AGE_SECS: u64 = 30;

/// Bounded retry schedule for audit log lookups.
///
/// Discord writes audit log entries some time after the gateway event that caused
/// them is delivered, so an immediate lookup can miss the entry. Attempt `n` (1-based)
/// is followed by a delay of `backoff * n` before the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRetryPolicy {
    /// Total number of lookups, including the first one. Treated as at least 1.
    pub attempts: u32,
    /// Base delay between lookups.
    pub backoff: Duration,
}

impl AuditRetryPolicy {
    /// A policy that performs exactly one immediate lookup.
    pub fn single() -> Self {
        Self {
            attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    /// Delay to wait after the given failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff * attempt
    }
}

impl Default for AuditRetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_AUDIT_ATTEMPTS,
            backoff: Duration::from_millis(DEFAULT_AUDIT_BACKOFF_MS),
        }
    }
}

/// Tuning for the antinuke engine.
#[derive(Debug, Clone, PartialEq)]
pub struct AntinukeConfig {
    /// How many of the most recent audit log entries are inspected per lookup.
    pub audit_lookback: u8,
    pub audit_retry: AuditRetryPolicy,
    /// Entries recorded longer ago than this belong to an earlier action and are ignored.
    pub audit_max_age: Duration,
    /// Upper bound for any single Discord API call made by the engine.
    pub platform_timeout: Duration,
}

impl Default for AntinukeConfig {
    fn default() -> Self {
        Self {
            audit_lookback: DEFAULT_AUDIT_LOOKBACK,
            audit_retry: AuditRetryPolicy::default(),
            audit_max_age: Duration::from_secs(DEFAULT_AUDIT_MAX_AGE_SECS),
            platform_timeout: Duration::from_secs(DEFAULT_PLATFORM_TIMEOUT_SECS),
        }
    }
}

pub struct Config {
    pub discord_bot_token: String,
    pub command_prefix: String,
    pub log_level: Level,
    pub antinuke: AntinukeConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = AntinukeConfig::default();

        let audit_lookback = parse_env("ANTINUKE_AUDIT_LOOKBACK", defaults.audit_lookback)?;
        if audit_lookback == 0 || audit_lookback > 100 {
            return Err(ConfigError::InvalidEnvVar {
                name: "ANTINUKE_AUDIT_LOOKBACK".to_string(),
                value: audit_lookback.to_string(),
            }
            .into());
        }

        let attempts = parse_env("ANTINUKE_AUDIT_ATTEMPTS", DEFAULT_AUDIT_ATTEMPTS)?.max(1);
        let backoff_ms = parse_env("ANTINUKE_AUDIT_BACKOFF_MS", DEFAULT_AUDIT_BACKOFF_MS)?;
        let max_age_secs = non_zero(
            "ANTINUKE_AUDIT_MAX_AGE_SECS",
            parse_env("ANTINUKE_AUDIT_MAX_AGE_SECS", DEFAULT_AUDIT_MAX_AGE_SECS)?,
        )?;
        // A zero timeout would fail every Discord call and silently disable the engine
        let timeout_secs = non_zero(
            "ANTINUKE_PLATFORM_TIMEOUT_SECS",
            parse_env(
                "ANTINUKE_PLATFORM_TIMEOUT_SECS",
                DEFAULT_PLATFORM_TIMEOUT_SECS,
            )?,
        )?;

        Ok(Self {
            discord_bot_token: std::env::var("DISCORD_BOT_TOKEN")
                .map_err(|_| ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string()))?,
            command_prefix: std::env::var("BOT_PREFIX")
                .unwrap_or_else(|_| DEFAULT_COMMAND_PREFIX.to_string()),
            log_level: parse_env("LOG_LEVEL", Level::INFO)?,
            antinuke: AntinukeConfig {
                audit_lookback,
                audit_retry: AuditRetryPolicy {
                    attempts,
                    backoff: Duration::from_millis(backoff_ms),
                },
                audit_max_age: Duration::from_secs(max_age_secs),
                platform_timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

/// Reads an optional environment variable, falling back to `default` when unset.
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidEnvVar {
                name: name.to_string(),
                value,
            }),
        Err(_) => Ok(default),
    }
}

/// Rejects a zero value for a variable that must be positive.
fn non_zero(name: &str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    Ok(value)
}
