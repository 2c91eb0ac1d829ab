//! BlockingChannel - mutex + condvar handoff queue
//!
//! Senders never block. Receivers sleep on the condition variable until an
//! item is pending, then take the most recently sent one.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use super::error::ChannelError;

/// Thread-safe multi-producer, multi-consumer handoff queue
///
/// Every value passed to [`send`](Self::send) is handed to exactly one
/// receiver. Pending values are removed newest-first (LIFO): two sends
/// with no receive in between come back in reverse order.
#[derive(Debug)]
pub struct BlockingChannel<T> {
    queue: Mutex<Vec<T>>,
    ready: Condvar,
}

impl<T> BlockingChannel<T> {
    /// Create an empty channel
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(Vec::new()),
            ready: Condvar::new(),
        }
    }

    // A panic while holding the lock cannot leave the Vec half-mutated,
    // so a poisoned guard is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Push a value and wake one blocked receiver
    pub fn send(&self, value: T) {
        let mut queue = self.lock();
        queue.push(value);
        let pending = queue.len();
        drop(queue);

        debug!(pending, "BlockingChannel::send: value queued");
        self.ready.notify_one();
    }

    /// Block until a value is available and take the newest one
    pub fn receive(&self) -> T {
        let mut queue = self.lock();
        loop {
            // Re-checked after every wake: spurious wakeups and competing
            // receivers can both leave the queue empty here.
            if let Some(value) = queue.pop() {
                debug!(pending = queue.len(), "BlockingChannel::receive: value taken");
                return value;
            }

            queue = self.ready.wait(queue).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like [`receive`](Self::receive), but give up after `timeout`
    pub fn receive_timeout(&self, timeout: Duration) -> Result<T, ChannelError> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            // Deadline is unrepresentable, which is as good as forever
            return Ok(self.receive());
        };

        let mut queue = self.lock();
        loop {
            if let Some(value) = queue.pop() {
                debug!(pending = queue.len(), "BlockingChannel::receive_timeout: value taken");
                return Ok(value);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                debug!(?timeout, "BlockingChannel::receive_timeout: timed out");
                return Err(ChannelError::Timeout(timeout));
            }

            let (guard, _) = self
                .ready
                .wait_timeout(queue, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            queue = guard;
        }
    }

    /// Take the newest pending value without blocking
    pub fn try_receive(&self) -> Option<T> {
        self.lock().pop()
    }

    /// Number of values waiting to be received
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<T> Default for BlockingChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_channel_is_empty() {
        let channel: BlockingChannel<u32> = BlockingChannel::new();
        assert!(channel.is_empty());
        assert_eq!(channel.len(), 0);
        assert_eq!(channel.try_receive(), None);
    }

    #[test]
    fn test_receive_is_lifo() {
        let channel = BlockingChannel::new();
        channel.send("a");
        channel.send("b");

        assert_eq!(channel.receive(), "b");
        assert_eq!(channel.receive(), "a");
        assert!(channel.is_empty());
    }

    #[test]
    fn test_lifo_with_interleaved_receive() {
        let channel = BlockingChannel::new();
        channel.send(1);
        channel.send(2);
        assert_eq!(channel.receive(), 2);

        channel.send(3);
        assert_eq!(channel.receive(), 3);
        assert_eq!(channel.receive(), 1);
    }

    #[test]
    fn test_send_transfers_ownership() {
        let channel = BlockingChannel::new();
        let value = String::from("owned");
        channel.send(value);

        let received = channel.receive();
        assert_eq!(received, "owned");
    }

    #[test]
    fn test_receive_blocks_until_send() {
        let channel = Arc::new(BlockingChannel::new());
        let delay = Duration::from_millis(100);

        let sender = Arc::clone(&channel);
        let handle = thread::spawn(move || {
            thread::sleep(delay);
            sender.send(42u32);
        });

        let start = Instant::now();
        let value = channel.receive();
        let waited = start.elapsed();

        handle.join().unwrap();
        assert_eq!(value, 42);
        assert!(waited >= delay, "receive returned after {:?}", waited);
    }

    #[test]
    fn test_receive_timeout_expires_on_empty() {
        let channel: BlockingChannel<u32> = BlockingChannel::new();
        let timeout = Duration::from_millis(50);

        let start = Instant::now();
        let result = channel.receive_timeout(timeout);

        assert_eq!(result, Err(ChannelError::Timeout(timeout)));
        assert!(start.elapsed() >= timeout);
    }

    #[test]
    fn test_receive_timeout_returns_pending_value() {
        let channel = BlockingChannel::new();
        channel.send(7u32);
        channel.send(8u32);

        assert_eq!(channel.receive_timeout(Duration::ZERO), Ok(8));
        assert_eq!(channel.receive_timeout(Duration::from_millis(10)), Ok(7));
    }

    #[test]
    fn test_receive_timeout_wakes_on_send() {
        let channel = Arc::new(BlockingChannel::new());

        let sender = Arc::clone(&channel);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            sender.send("late");
        });

        let result = channel.receive_timeout(Duration::from_secs(5));
        handle.join().unwrap();
        assert_eq!(result, Ok("late"));
    }

    #[test]
    fn test_receive_timeout_max_duration_behaves_like_receive() {
        let channel = BlockingChannel::new();
        channel.send(1u8);
        assert_eq!(channel.receive_timeout(Duration::MAX), Ok(1));
    }

    #[test]
    fn test_survives_poisoned_lock() {
        let channel = Arc::new(BlockingChannel::new());
        channel.send(5u32);

        let poisoner = Arc::clone(&channel);
        let result = thread::spawn(move || {
            let _guard = poisoner.queue.lock().unwrap();
            panic!("poison the channel lock");
        })
        .join();
        assert!(result.is_err());

        assert_eq!(channel.len(), 1);
        assert_eq!(channel.receive(), 5);
    }
}
