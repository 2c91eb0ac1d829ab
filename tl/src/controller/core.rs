//! PhaseController - owns the light and drives its toggle loop

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::channel::BlockingChannel;
use crate::domain::Phase;
use crate::waiter::PhaseWaiter;

use super::config::ControllerConfig;
use super::error::ControllerError;
use super::timing::DurationSource;

/// Name given to the background thread started by [`PhaseController::simulate`]
pub const CONTROLLER_THREAD_NAME: &str = "phase-controller";

/// Traffic light state machine
///
/// Starts at [`Phase::Red`] and flips phase after every interval drawn from
/// its [`DurationSource`], publishing each new phase on a channel it owns for
/// its whole lifetime.
pub struct PhaseController {
    /// Current phase, stored as its discriminant so readers never race the loop
    phase: AtomicU8,
    channel: Arc<BlockingChannel<Phase>>,
    /// Held for a full cycle so toggles and publishes cannot interleave
    source: Mutex<Box<dyn DurationSource>>,
    yield_delay: Duration,
}

impl PhaseController {
    /// Create a controller with a uniformly random interval source
    pub fn new(config: &ControllerConfig) -> Result<Self, ControllerError> {
        let source = config.duration_source()?;
        Ok(Self::with_source(config, source))
    }

    /// Create a controller with a caller-provided interval source
    pub fn with_source(config: &ControllerConfig, source: impl DurationSource + 'static) -> Self {
        debug!(yield_micros = config.yield_micros, "PhaseController::with_source: called");
        let source: Box<dyn DurationSource> = Box::new(source);
        Self {
            phase: AtomicU8::new(Phase::Red.as_u8()),
            channel: Arc::new(BlockingChannel::new()),
            source: Mutex::new(source),
            yield_delay: config.yield_delay(),
        }
    }

    /// Latest committed phase
    pub fn current_phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Channel the controller publishes on
    pub fn channel(&self) -> Arc<BlockingChannel<Phase>> {
        Arc::clone(&self.channel)
    }

    /// A waiter consuming from this controller's channel
    pub fn waiter(&self) -> PhaseWaiter {
        PhaseWaiter::new(self.channel())
    }

    /// Run a single cycle: wait, toggle, publish
    ///
    /// Returns the phase that was published.
    pub fn cycle_once(&self) -> Phase {
        let mut source = self.source.lock().unwrap_or_else(PoisonError::into_inner);
        let start = Instant::now();

        let interval = source.next_interval();
        debug!(?interval, "PhaseController::cycle_once: holding phase");
        thread::sleep(interval);

        // Committed before the send so current_phase() never lags the channel
        let previous = Phase::from_u8(self.phase.fetch_xor(1, Ordering::AcqRel));
        let phase = previous.toggled();
        self.channel.send(phase);
        info!(%phase, "Message {} has been sent to the queue", phase);

        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(elapsed_ms, "Cycle elapsed time: {} milliseconds", elapsed_ms);

        phase
    }

    /// Cycle forever on the calling thread
    pub fn run(&self) -> ! {
        info!(phase = %self.current_phase(), "PhaseController::run: starting toggle loop");
        loop {
            self.cycle_once();
            if self.yield_delay.is_zero() {
                thread::yield_now();
            } else {
                thread::sleep(self.yield_delay);
            }
        }
    }

    /// Start [`run`](Self::run) on a background thread
    ///
    /// The loop never ends, so joining the handle blocks forever.
    pub fn simulate(self: &Arc<Self>) -> Result<JoinHandle<()>, ControllerError> {
        let controller = Arc::clone(self);
        let handle = thread::Builder::new()
            .name(CONTROLLER_THREAD_NAME.to_string())
            .spawn(move || {
                controller.run();
            })?;
        debug!("PhaseController::simulate: controller thread spawned");
        Ok(handle)
    }
}

impl std::fmt::Debug for PhaseController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseController")
            .field("phase", &self.current_phase())
            .field("pending", &self.channel.len())
            .field("yield_delay", &self.yield_delay)
            .finish_non_exhaustive()
    }
}
