//! Configuration loading
//!
//! Configuration is loaded from `~/.config/studytrack/config.toml`.
//!
//! Paths follow the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/studytrack/` (~/.config/studytrack/)
//! - Data: `$XDG_DATA_HOME/studytrack/` (~/.local/share/studytrack/)
//! - State/Logs: `$XDG_STATE_HOME/studytrack/` (~/.local/state/studytrack/)

use crate::analytics::ZoomLevel;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "studytrack";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(fallback))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Dashboard defaults
    #[serde(default)]
    pub dashboard: DashboardConfig,
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

/// Dashboard defaults
#[derive(Debug, Deserialize, Default)]
pub struct DashboardConfig {
    /// Zoom level charts open at
    #[serde(default)]
    pub default_zoom: ZoomLevel,

    /// Snapshot file to read; defaults to [`Config::default_snapshot_path`]
    pub snapshot_path: Option<PathBuf>,
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

    /// Reject values that would leave logging unusable.
    pub fn validate(&self) -> Result<()> {
        if self.logging.max_files == 0 {
            return Err(Error::Config(
                "logging.max_files must be at least 1".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(Error::Config("logging.level must not be empty".to_string()));
        }
        Ok(())
    }

    /// Snapshot file this configuration points at.
    pub fn snapshot_path(&self) -> PathBuf {
        self.dashboard
            .snapshot_path
            .clone()
            .unwrap_or_else(Self::default_snapshot_path)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/studytrack/config.toml`
    pub fn config_path() -> PathBuf {
        xdg_dir("XDG_CONFIG_HOME", ".config")
            .join(APP_DIR)
            .join("config.toml")
    }

    /// `$XDG_DATA_HOME/studytrack/`
    pub fn data_dir() -> PathBuf {
        xdg_dir("XDG_DATA_HOME", ".local/share").join(APP_DIR)
    }

    /// `$XDG_STATE_HOME/studytrack/` (logs)
    pub fn state_dir() -> PathBuf {
        xdg_dir("XDG_STATE_HOME", ".local/state").join(APP_DIR)
    }

    /// `$XDG_DATA_HOME/studytrack/snapshot.json`
    pub fn default_snapshot_path() -> PathBuf {
        Self::data_dir().join("snapshot.json")
    }

    /// `$XDG_STATE_HOME/studytrack/studytrack.log`
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("studytrack.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// Called by the CLI before anything reads these variables so every
    /// component resolves the same directories.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        for (var, fallback) in [
            ("XDG_DATA_HOME", ".local/share"),
            ("XDG_STATE_HOME", ".local/state"),
            ("XDG_CONFIG_HOME", ".config"),
        ] {
            if std::env::var_os(var).is_none() {
                std::env::set_var(var, home.join(fallback));
            }
        }
    }
}
