//! Controller error types

use thiserror::Error;

/// Errors that can occur while building or starting a controller
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Invalid cycle range: min {min}s is greater than max {max}s")]
    InvalidRange { min: u64, max: u64 },

    #[error("Failed to spawn controller thread: {0}")]
    Spawn(#[from] std::io::Error),
}
