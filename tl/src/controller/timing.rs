//! Cycle interval sources
//!
//! The controller asks a [`DurationSource`] how long to hold each phase.
//! Production uses [`UniformDurationSource`]; tests plug in a
//! [`SequenceDurationSource`] for deterministic timing.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::error::ControllerError;

/// Default lower bound of the cycle interval, in seconds
pub const DEFAULT_MIN_SECS: u64 = 4;

/// Default upper bound of the cycle interval, in seconds
pub const DEFAULT_MAX_SECS: u64 = 6;

/// Supplies the wait before each phase toggle
pub trait DurationSource: Send {
    fn next_interval(&mut self) -> Duration;
}

/// Whole-second intervals drawn uniformly from a closed range
#[derive(Debug)]
pub struct UniformDurationSource {
    min_secs: u64,
    max_secs: u64,
    rng: StdRng,
}

impl UniformDurationSource {
    /// Create a source seeded from the operating system
    pub fn new(min_secs: u64, max_secs: u64) -> Result<Self, ControllerError> {
        Self::check_range(min_secs, max_secs)?;
        debug!(min_secs, max_secs, "UniformDurationSource::new: called");
        Ok(Self {
            min_secs,
            max_secs,
            rng: StdRng::from_os_rng(),
        })
    }

    /// Create a reproducible source from a fixed seed
    pub fn seeded(min_secs: u64, max_secs: u64, seed: u64) -> Result<Self, ControllerError> {
        Self::check_range(min_secs, max_secs)?;
        debug!(min_secs, max_secs, seed, "UniformDurationSource::seeded: called");
        Ok(Self {
            min_secs,
            max_secs,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    fn check_range(min: u64, max: u64) -> Result<(), ControllerError> {
        if min > max {
            return Err(ControllerError::InvalidRange { min, max });
        }
        Ok(())
    }

    pub fn min_secs(&self) -> u64 {
        self.min_secs
    }

    pub fn max_secs(&self) -> u64 {
        self.max_secs
    }
}

impl Default for UniformDurationSource {
    fn default() -> Self {
        Self {
            min_secs: DEFAULT_MIN_SECS,
            max_secs: DEFAULT_MAX_SECS,
            rng: StdRng::from_os_rng(),
        }
    }
}

impl DurationSource for UniformDurationSource {
    fn next_interval(&mut self) -> Duration {
        Duration::from_secs(self.rng.random_range(self.min_secs..=self.max_secs))
    }
}

/// Replays a fixed list of intervals, wrapping around at the end
#[derive(Debug, Clone, Default)]
pub struct SequenceDurationSource {
    durations: Vec<Duration>,
    next: usize,
}

impl SequenceDurationSource {
    pub fn new(durations: impl Into<Vec<Duration>>) -> Self {
        Self {
            durations: durations.into(),
            next: 0,
        }
    }

    /// Always return the same interval
    pub fn fixed(duration: Duration) -> Self {
        Self::new(vec![duration])
    }
}

impl DurationSource for SequenceDurationSource {
    fn next_interval(&mut self) -> Duration {
        if self.durations.is_empty() {
            return Duration::ZERO;
        }
        let duration = self.durations[self.next];
        self.next = (self.next + 1) % self.durations.len();
        duration
    }
}
