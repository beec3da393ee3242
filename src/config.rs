//! Configuration management and validation.
//!
//! Configuration is layered: built-in defaults, then an optional JSON file,
//! then environment variables, then command-line flags (applied by the CLI).
//! Every section uses serde defaults, so a config file only needs the keys
//! it wants to change.

use crate::constants::{
    APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_DATABASE_FILE,
    DEFAULT_LOG_LEVEL, ENV_DATABASE, ENV_LOG_LEVEL,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level loader configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub display_ranges: DisplayRangeConfig,
    pub logging: LoggingConfig,
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file
    pub path: PathBuf,

    /// How long a load waits for another writer before failing
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: Config::default_database_path(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Display range routines run after every successful data commit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayRangeConfig {
    /// SQL statements; `?1` is bound to the trip id
    pub routines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing level when RUST_LOG is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Default database location under the platform data directory
    pub fn default_database_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
            .join(DEFAULT_DATABASE_FILE)
    }

    /// Default config file location under the platform config directory
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))
    }

    /// Read a JSON config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;
        serde_json::from_str(&content).map_err(|e| {
            Error::configuration(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// Defaults, then the config file if given, then environment variables
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment overrides using the given variable lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DATABASE).filter(|v| !v.trim().is_empty()) {
            debug!("Database path overridden by {}", ENV_DATABASE);
            self.database.path = PathBuf::from(path);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            self.logging.level = level;
        }
    }

    /// Reject settings the loader cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(Error::configuration("Database path must not be empty"));
        }
        if self.database.busy_timeout_ms == 0 {
            return Err(Error::configuration(
                "Database busy timeout must be greater than zero",
            ));
        }
        if let Some(index) = self
            .display_ranges
            .routines
            .iter()
            .position(|sql| sql.trim().is_empty())
        {
            return Err(Error::configuration(format!(
                "Display range routine {} is empty",
                index + 1
            )));
        }
        Ok(())
    }
}
