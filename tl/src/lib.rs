//! Trafficlight - a randomized two-phase traffic light
//!
//! A [`PhaseController`] flips the light between red and green after a random
//! 4-6 second hold and publishes every new phase on a [`BlockingChannel`].
//! [`PhaseWaiter`]s block on that channel instead of polling.
//!
//! # Modules
//!
//! - [`channel`] - Mutex/condvar handoff queue (LIFO, unicast)
//! - [`controller`] - Phase state machine and interval sources
//! - [`waiter`] - Blocking wait-for-green consumers
//! - [`domain`] - The [`Phase`] type
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod channel;
pub mod cli;
pub mod config;
pub mod controller;
pub mod domain;
pub mod waiter;

// Re-export commonly used types
pub use channel::{BlockingChannel, ChannelError};
pub use config::{Config, WaiterConfig};
pub use controller::{
    ControllerConfig, ControllerError, DurationSource, PhaseController, SequenceDurationSource, UniformDurationSource,
};
pub use domain::Phase;
pub use waiter::PhaseWaiter;
