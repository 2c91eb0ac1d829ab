//! Phase waiters
//!
//! A [`PhaseWaiter`] blocks on the controller's channel until a target phase
//! shows up, discarding everything else it receives.
//!
//! # Shared consumption
//!
//! The channel is unicast. With several waiters on one channel each
//! notification is consumed by exactly one of them, so a waiter can miss a
//! Green that another waiter took. Callers that need every waiter to see
//! every Green must give each waiter its own channel.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::channel::{BlockingChannel, ChannelError};
use crate::domain::Phase;

/// Consumer side of the phase channel
#[derive(Debug, Clone)]
pub struct PhaseWaiter {
    channel: Arc<BlockingChannel<Phase>>,
}

impl PhaseWaiter {
    pub fn new(channel: Arc<BlockingChannel<Phase>>) -> Self {
        Self { channel }
    }

    /// Block until a Green notification is received
    pub fn wait_for_green(&self) {
        info!("Waiting for green...");
        let consumed = self.wait_for(Phase::Green);
        info!(consumed, "Traffic light is green");
    }

    /// Block until `target` is received
    ///
    /// Returns how many notifications were consumed, the matching one included.
    pub fn wait_for(&self, target: Phase) -> usize {
        let mut consumed = 0;
        loop {
            let phase = self.channel.receive();
            consumed += 1;
            if phase == target {
                return consumed;
            }
            debug!(%phase, %target, "PhaseWaiter::wait_for: discarding phase");
        }
    }

    /// Like [`wait_for_green`](Self::wait_for_green), with an overall deadline
    pub fn wait_for_green_timeout(&self, timeout: Duration) -> Result<usize, ChannelError> {
        info!(?timeout, "Waiting for green...");
        let consumed = self.wait_for_timeout(Phase::Green, timeout)?;
        info!(consumed, "Traffic light is green");
        Ok(consumed)
    }

    /// Like [`wait_for`](Self::wait_for), giving up once `timeout` has elapsed
    pub fn wait_for_timeout(&self, target: Phase, timeout: Duration) -> Result<usize, ChannelError> {
        let start = Instant::now();
        let mut consumed = 0;
        loop {
            let remaining = timeout.saturating_sub(start.elapsed());
            let phase = self
                .channel
                .receive_timeout(remaining)
                .map_err(|_| ChannelError::Timeout(timeout))?;
            consumed += 1;
            if phase == target {
                return Ok(consumed);
            }
            debug!(%phase, %target, "PhaseWaiter::wait_for_timeout: discarding phase");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn channel_with(phases: &[Phase]) -> Arc<BlockingChannel<Phase>> {
        let channel = Arc::new(BlockingChannel::new());
        for &phase in phases {
            channel.send(phase);
        }
        channel
    }

    #[test]
    fn test_green_alone_returns_after_one_receive() {
        let channel = channel_with(&[Phase::Green]);
        let waiter = PhaseWaiter::new(Arc::clone(&channel));

        assert_eq!(waiter.wait_for(Phase::Green), 1);
        assert!(channel.is_empty());
    }

    #[test]
    fn test_consumes_all_three_messages() {
        // LIFO: sending Green, Red, Red delivers Red, Red, Green
        let channel = channel_with(&[Phase::Green, Phase::Red, Phase::Red]);
        let waiter = PhaseWaiter::new(Arc::clone(&channel));

        waiter.wait_for_green();
        assert!(channel.is_empty());
    }

    #[test]
    fn test_red_red_green_fed_live() {
        let channel = Arc::new(BlockingChannel::new());
        let waiter = PhaseWaiter::new(Arc::clone(&channel));

        let handle = thread::spawn(move || waiter.wait_for(Phase::Green));
        for phase in [Phase::Red, Phase::Red, Phase::Green] {
            thread::sleep(Duration::from_millis(20));
            channel.send(phase);
        }

        assert_eq!(handle.join().unwrap(), 3);
        assert!(channel.is_empty());
    }

    #[test]
    fn test_wait_for_red() {
        let channel = channel_with(&[Phase::Red, Phase::Green]);
        let waiter = PhaseWaiter::new(channel);

        assert_eq!(waiter.wait_for(Phase::Red), 2);
    }

    #[test]
    fn test_green_timeout_without_green() {
        let channel = channel_with(&[Phase::Red]);
        let waiter = PhaseWaiter::new(Arc::clone(&channel));
        let timeout = Duration::from_millis(50);

        let start = Instant::now();
        let result = waiter.wait_for_green_timeout(timeout);

        assert_eq!(result, Err(ChannelError::Timeout(timeout)));
        assert!(start.elapsed() >= timeout);
        assert!(channel.is_empty(), "the Red should still have been consumed");
    }

    #[test]
    fn test_green_timeout_success() {
        let channel = channel_with(&[Phase::Green, Phase::Red]);
        let waiter = PhaseWaiter::new(channel);

        assert_eq!(waiter.wait_for_green_timeout(Duration::from_secs(1)), Ok(2));
    }

    #[test]
    fn test_clones_share_channel() {
        let channel = channel_with(&[Phase::Green]);
        let first = PhaseWaiter::new(Arc::clone(&channel));
        let second = first.clone();

        assert_eq!(first.wait_for(Phase::Green), 1);
        assert_eq!(
            second.wait_for_timeout(Phase::Green, Duration::from_millis(20)),
            Err(ChannelError::Timeout(Duration::from_millis(20)))
        );
    }
}
