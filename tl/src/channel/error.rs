//! Channel error types

use std::time::Duration;
use thiserror::Error;

/// Errors returned by the bounded receive operations
///
/// The plain `send`/`receive` pair never fails; only callers that opt into a
/// deadline can see one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("No message received within {0:?}")]
    Timeout(Duration),
}
