//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use chore_tracker_core::NotificationPermission;
use chrono::FixedOffset;
use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// When absent the household lives in process memory only.
    pub database_url: Option<String>,
    pub log_level: Level,
    pub utc_offset: FixedOffset,
    pub notification_permission: NotificationPermission,
    pub cors_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // --- Server and Storage Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Household Settings ---
        let utc_offset = match lookup("HOUSEHOLD_UTC_OFFSET_MINUTES") {
            Some(raw) => parse_offset(&raw)?,
            None => FixedOffset::east_opt(0).ok_or_else(|| {
                ConfigError::InvalidValue("HOUSEHOLD_UTC_OFFSET_MINUTES".to_string(), "0".to_string())
            })?,
        };

        let notification_permission = match lookup("NOTIFICATION_PERMISSION") {
            Some(raw) => parse_permission(&raw)?,
            None => NotificationPermission::Default,
        };

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            utc_offset,
            notification_permission,
            cors_origin,
        })
    }
}

fn parse_offset(raw: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = |reason: &str| {
        ConfigError::InvalidValue(
            "HOUSEHOLD_UTC_OFFSET_MINUTES".to_string(),
            format!("'{}' {}", raw, reason),
        )
    };
    let minutes = raw
        .trim()
        .parse::<i32>()
        .map_err(|_| invalid("is not a whole number of minutes"))?;
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| invalid("is outside of -1439..=1439"))
}

fn parse_permission(raw: &str) -> Result<NotificationPermission, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "granted" => Ok(NotificationPermission::Granted),
        "denied" => Ok(NotificationPermission::Denied),
        "default" => Ok(NotificationPermission::Default),
        other => Err(ConfigError::InvalidValue(
            "NOTIFICATION_PERMISSION".to_string(),
            format!("'{}' is not one of granted, denied, default", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_address.to_string(), "0.0.0.0:3000");
        assert_eq!(config.database_url, None);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.utc_offset.local_minus_utc(), 0);
        assert_eq!(config.notification_permission, NotificationPermission::Default);
    }

    #[test]
    fn household_settings_are_parsed() {
        let config = load(&[
            ("HOUSEHOLD_UTC_OFFSET_MINUTES", "-300"),
            ("NOTIFICATION_PERMISSION", "Granted"),
            ("DATABASE_URL", "postgres://localhost/chores"),
        ])
        .unwrap();
        assert_eq!(config.utc_offset.local_minus_utc(), -300 * 60);
        assert_eq!(config.notification_permission, NotificationPermission::Granted);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/chores"));
    }

    #[test]
    fn invalid_values_are_reported_by_variable() {
        for (key, value) in [
            ("BIND_ADDRESS", "nowhere"),
            ("RUST_LOG", "chatty"),
            ("HOUSEHOLD_UTC_OFFSET_MINUTES", "5000"),
            ("NOTIFICATION_PERMISSION", "maybe"),
        ] {
            match load(&[(key, value)]) {
                Err(ConfigError::InvalidValue(var, _)) => assert_eq!(var, key),
                other => panic!("expected invalid {key}, got {other:?}"),
            }
        }
    }
}
