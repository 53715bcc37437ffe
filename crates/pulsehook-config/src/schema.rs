//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub trigger: TriggerConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Reject values the runtime cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trigger.cadence_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "trigger.cadence_secs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.trigger.max_concurrent_dispatches == 0 {
            return Err(ConfigError::InvalidValue {
                field: "trigger.max_concurrent_dispatches".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.dispatch.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dispatch.request_timeout_secs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Job store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database path.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            connect_timeout_secs: default_connect_timeout(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("pulsehook.db")
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_fetch_timeout() -> u64 {
    10
}

/// Trigger loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Seconds between ticks.
    #[serde(default = "default_cadence")]
    pub cadence_secs: u64,

    /// Cap on simultaneous in-flight dispatches within one tick.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_dispatches: usize,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            cadence_secs: default_cadence(),
            max_concurrent_dispatches: default_max_concurrent(),
        }
    }
}

fn default_cadence() -> u64 {
    60
}

fn default_max_concurrent() -> usize {
    8
}

/// Dispatcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_request_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("pulsehook/{}", env!("CARGO_PKG_VERSION"))
}

/// Log output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Directory for rolling log files. Console-only when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.trigger.cadence_secs, 60);
        assert_eq!(config.trigger.max_concurrent_dispatches, 8);
        assert_eq!(config.store.connect_timeout_secs, 10);
        assert_eq!(config.dispatch.request_timeout_secs, 30);
        assert!(config.log.dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_cadence() {
        let mut config = Config::default();
        config.trigger.cadence_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_zero_concurrency() {
        let mut config = Config::default();
        config.trigger.max_concurrent_dispatches = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_request_timeout() {
        let mut config = Config::default();
        config.dispatch.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
