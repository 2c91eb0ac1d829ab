//! Controller configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::ControllerError;
use super::timing::{DEFAULT_MAX_SECS, DEFAULT_MIN_SECS, UniformDurationSource};

/// Phase cycling configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Shortest time a phase is held, in seconds
    #[serde(rename = "min-secs", default = "default_min_secs")]
    pub min_secs: u64,

    /// Longest time a phase is held, in seconds
    #[serde(rename = "max-secs", default = "default_max_secs")]
    pub max_secs: u64,

    /// Pause after each publish, in microseconds
    #[serde(rename = "yield-micros", default = "default_yield_micros")]
    pub yield_micros: u64,

    /// Fixed RNG seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_min_secs() -> u64 {
    DEFAULT_MIN_SECS
}

fn default_max_secs() -> u64 {
    DEFAULT_MAX_SECS
}

fn default_yield_micros() -> u64 {
    1_000
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            min_secs: DEFAULT_MIN_SECS,
            max_secs: DEFAULT_MAX_SECS,
            yield_micros: 1_000,
            seed: None,
        }
    }
}

impl ControllerConfig {
    /// Get the post-publish pause as a Duration
    pub fn yield_delay(&self) -> Duration {
        Duration::from_micros(self.yield_micros)
    }

    /// Build the interval source described by this config
    pub fn duration_source(&self) -> Result<UniformDurationSource, ControllerError> {
        match self.seed {
            Some(seed) => UniformDurationSource::seeded(self.min_secs, self.max_secs, seed),
            None => UniformDurationSource::new(self.min_secs, self.max_secs),
        }
    }
}
