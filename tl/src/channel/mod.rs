//! Blocking message channel
//!
//! The channel carries phase notifications from the controller thread to
//! any number of waiters. Delivery is unicast: each value reaches exactly one
//! receiver.

mod blocking;
mod error;

pub use blocking::BlockingChannel;
pub use error::ChannelError;
