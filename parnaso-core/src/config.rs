//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/parnaso/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/parnaso/` (~/.config/parnaso/)
//! - Data: `$XDG_DATA_HOME/parnaso/` (~/.local/share/parnaso/)
//! - State/Logs: `$XDG_STATE_HOME/parnaso/` (~/.local/state/parnaso/)

use crate::analytics::DateFilter;
use crate::error::{Error, Result};
use crate::types::UserSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Goal defaults for users without stored settings
    #[serde(default)]
    pub goals: GoalsConfig,

    /// Dashboard defaults
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Storage overrides
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Default word goals
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct GoalsConfig {
    #[serde(default = "default_daily_word_goal")]
    pub daily_word_goal: u64,

    #[serde(default = "default_weekly_word_goal")]
    pub weekly_word_goal: u64,
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            daily_word_goal: default_daily_word_goal(),
            weekly_word_goal: default_weekly_word_goal(),
        }
    }
}

impl GoalsConfig {
    /// Settings handed to users who never saved their own.
    pub fn default_settings(&self) -> UserSettings {
        UserSettings {
            daily_word_goal: self.daily_word_goal,
            weekly_word_goal: self.weekly_word_goal,
        }
    }
}

fn default_daily_word_goal() -> u64 {
    500
}

fn default_weekly_word_goal() -> u64 {
    3500
}

/// Dashboard configuration
#[derive(Debug, Deserialize)]
pub struct DashboardConfig {
    /// Date range used when none is given on the command line
    #[serde(default = "default_filter")]
    pub default_filter: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_filter: default_filter(),
        }
    }
}

impl DashboardConfig {
    /// Parsed default filter
    pub fn filter(&self) -> Result<DateFilter> {
        self.default_filter
            .parse()
            .map_err(|e: String| Error::Config(format!("dashboard.default_filter: {}", e)))
    }
}

fn default_filter() -> String {
    DateFilter::Last7Days.as_str().to_string()
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

/// Storage configuration
#[derive(Debug, Deserialize, Default)]
pub struct StorageConfig {
    /// Override for the SQLite database location
    pub database_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.goals.daily_word_goal == 0 {
            return Err(Error::Config(
                "goals.daily_word_goal must be greater than 0".to_string(),
            ));
        }
        if self.goals.weekly_word_goal == 0 {
            return Err(Error::Config(
                "goals.weekly_word_goal must be greater than 0".to_string(),
            ));
        }
        self.dashboard.filter()?;
        Ok(())
    }

    /// Database location, honoring `storage.database_path`
    pub fn resolved_database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(Self::database_path)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/parnaso/config.toml` (~/.config/parnaso/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("parnaso").join("config.toml")
    }

    /// Returns the data directory path (for SQLite database)
    ///
    /// `$XDG_DATA_HOME/parnaso/` (~/.local/share/parnaso/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("parnaso")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/parnaso/` (~/.local/state/parnaso/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("parnaso")
    }

    /// Returns the database file path
    ///
    /// `$XDG_DATA_HOME/parnaso/parnaso.db` (~/.local/share/parnaso/parnaso.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("parnaso.db")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/parnaso/parnaso.log` (~/.local/state/parnaso/parnaso.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("parnaso.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// For CLI binaries that want explicit, stable path behavior before
    /// invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_DATA_HOME").is_err() {
            std::env::set_var("XDG_DATA_HOME", home.join(".local/share"));
        }

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}
