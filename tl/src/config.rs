//! Traffic light configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::controller::ControllerConfig;

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = ".trafficlight.yml";

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Phase cycling
    pub cycle: ControllerConfig,

    /// Waiter threads started by the binary
    pub waiters: WaiterConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        if self.cycle.min_secs > self.cycle.max_secs {
            return Err(eyre::eyre!(
                "cycle.min-secs ({}) must not exceed cycle.max-secs ({})",
                self.cycle.min_secs,
                self.cycle.max_secs
            ));
        }
        if self.waiters.count == 0 {
            return Err(eyre::eyre!("waiters.count must be at least 1"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::implicit_paths() {
            if candidate.exists() {
                match Self::load_from_file(&candidate) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", candidate.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level, before logging is initialized
    ///
    /// Best effort: any failure yields `None` and is reported later by [`load`](Self::load).
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => Self::implicit_paths(),
        };

        candidates
            .iter()
            .filter(|path| path.exists())
            .find_map(|path| Self::parse_file(path).ok())
            .and_then(|config| config.log_level)
    }

    /// Project-local config first, then ~/.config/trafficlight/trafficlight.yml
    fn implicit_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("trafficlight").join("trafficlight.yml"));
        }
        paths
    }

    fn parse_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::parse_file(path.as_ref())?;
        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Waiter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaiterConfig {
    /// Number of waiter threads sharing the phase channel
    pub count: usize,

    /// Give up waiting for green after this many milliseconds; absent blocks forever
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: Option<u64>,
}

impl Default for WaiterConfig {
    fn default() -> Self {
        Self {
            count: 1,
            timeout_ms: None,
        }
    }
}

impl WaiterConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
