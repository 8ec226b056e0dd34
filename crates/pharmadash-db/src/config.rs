//! # Dashboard Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`PHARMADASH_*`)
//! 2. Defaults (this file)
//!
//! Configuration is read-only after loading.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use pharmadash_core::validation::validate_limit;

/// Environment variable overriding the database path.
pub const ENV_DB_PATH: &str = "PHARMADASH_DB_PATH";
/// Environment variable for the number of recent sales shown.
pub const ENV_RECENT_LIMIT: &str = "PHARMADASH_RECENT_LIMIT";
/// Environment variable for the default low-stock threshold.
pub const ENV_LOW_STOCK_THRESHOLD: &str = "PHARMADASH_LOW_STOCK_THRESHOLD";

/// Configuration loading errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    /// SQLite database file.
    pub database_path: PathBuf,

    /// Sales listed in the "recent sales" table.
    /// Default: 50
    pub recent_limit: u32,

    /// Reorder point for products without their own `min_stock`.
    /// Default: 5
    pub low_stock_threshold: i64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            database_path: default_database_path(),
            recent_limit: 50,
            low_stock_threshold: 5,
        }
    }
}

impl DashboardConfig {
    /// Loads configuration from the process environment.
    ///
    /// ## Environment Variables
    /// - `PHARMADASH_DB_PATH`: database file
    /// - `PHARMADASH_RECENT_LIMIT`: recent sales shown (1..=10000)
    /// - `PHARMADASH_LOW_STOCK_THRESHOLD`: default reorder point (≥ 0)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for
    /// missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = DashboardConfig::default();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.trim().is_empty()) {
            config.database_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(ENV_RECENT_LIMIT) {
            let limit: u32 = parse_value(ENV_RECENT_LIMIT, &raw)?;
            validate_limit(limit).map_err(|e| invalid(ENV_RECENT_LIMIT, &raw, e.to_string()))?;
            config.recent_limit = limit;
        }

        if let Some(raw) = lookup(ENV_LOW_STOCK_THRESHOLD) {
            let threshold: i64 = parse_value(ENV_LOW_STOCK_THRESHOLD, &raw)?;
            if threshold < 0 {
                return Err(invalid(ENV_LOW_STOCK_THRESHOLD, &raw, "must not be negative"));
            }
            config.low_stock_threshold = threshold;
        }

        Ok(config)
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| invalid(key, raw, e.to_string()))
}

fn invalid(key: &str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Platform data directory, or the working directory when none exists.
///
/// - **macOS**: `~/Library/Application Support/com.pharmadash.dashboard/pharmadash.db`
/// - **Linux**: `~/.local/share/dashboard/pharmadash.db`
fn default_database_path() -> PathBuf {
    ProjectDirs::from("com", "pharmadash", "dashboard")
        .map(|dirs| dirs.data_dir().join("pharmadash.db"))
        .unwrap_or_else(|| PathBuf::from("pharmadash.db"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<DashboardConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DashboardConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.recent_limit, 50);
        assert_eq!(config.low_stock_threshold, 5);
        assert!(config.database_path.ends_with("pharmadash.db"));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            (ENV_DB_PATH, "/tmp/pharmadash-test.db"),
            (ENV_RECENT_LIMIT, " 20 "),
            (ENV_LOW_STOCK_THRESHOLD, "0"),
        ])
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/pharmadash-test.db"));
        assert_eq!(config.recent_limit, 20);
        assert_eq!(config.low_stock_threshold, 0);
    }

    #[test]
    fn test_unparsable_limit() {
        let err = load(&[(ENV_RECENT_LIMIT, "fifty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_RECENT_LIMIT));
    }

    #[test]
    fn test_zero_limit_rejected() {
        assert!(load(&[(ENV_RECENT_LIMIT, "0")]).is_err());
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let err = load(&[(ENV_LOW_STOCK_THRESHOLD, "-2")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for PHARMADASH_LOW_STOCK_THRESHOLD: '-2' (must not be negative)"
        );
    }
}
