//! Phase controller
//!
//! Owns the light's current phase, flips it on a randomized interval, and
//! publishes every new phase through a [`BlockingChannel`](crate::channel::BlockingChannel).

mod config;
mod core;
mod error;
mod timing;

pub use config::ControllerConfig;
pub use self::core::{CONTROLLER_THREAD_NAME, PhaseController};
pub use error::ControllerError;
pub use timing::{DEFAULT_MAX_SECS, DEFAULT_MIN_SECS, DurationSource, SequenceDurationSource, UniformDurationSource};
