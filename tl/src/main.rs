//! Trafficlight - randomized two-phase traffic light
//!
//! CLI entry point: starts the phase controller in the background and blocks
//! on one or more waiters.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use trafficlight::cli::Cli;
use trafficlight::config::Config;
use trafficlight::{ChannelError, PhaseController, PhaseWaiter};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!(e))?;

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(count) = cli.waiters {
        debug!(count, "main: waiter count overridden from CLI");
        config.waiters.count = count;
    }
    config.validate().context("Invalid configuration")?;

    info!(
        min_secs = config.cycle.min_secs,
        max_secs = config.cycle.max_secs,
        waiters = config.waiters.count,
        "Trafficlight loaded config"
    );

    let controller = Arc::new(PhaseController::new(&config.cycle).context("Failed to create phase controller")?);

    // Detached: the toggle loop never ends, the process exits when the waiters do
    let _controller_thread = controller.simulate().context("Failed to start phase controller")?;

    let waiters = (0..config.waiters.count)
        .map(|id| spawn_waiter(id, controller.waiter(), config.waiters.timeout(), cli.cycles))
        .collect::<Result<Vec<_>>>()?;

    for (id, handle) in waiters.into_iter().enumerate() {
        handle
            .join()
            .map_err(|_| eyre::eyre!("waiter-{} panicked", id))?
            .context(format!("waiter-{} stopped waiting", id))?;
    }

    info!(phase = %controller.current_phase(), "All waiters finished");
    Ok(())
}

/// Start a waiter thread that observes `cycles` greens, or loops forever
fn spawn_waiter(
    id: usize,
    waiter: PhaseWaiter,
    timeout: Option<Duration>,
    cycles: Option<u32>,
) -> Result<JoinHandle<Result<(), ChannelError>>> {
    debug!(id, ?timeout, ?cycles, "spawn_waiter: called");
    let handle = thread::Builder::new()
        .name(format!("waiter-{}", id))
        .spawn(move || {
            let mut observed = 0u32;
            while cycles.is_none_or(|limit| observed < limit) {
                match timeout {
                    Some(timeout) => {
                        if let Err(e) = waiter.wait_for_green_timeout(timeout) {
                            warn!(error = %e, "Gave up waiting for green");
                            return Err(e);
                        }
                    }
                    None => waiter.wait_for_green(),
                }
                observed += 1;
            }
            Ok(())
        })
        .context("Failed to spawn waiter thread")?;
    Ok(handle)
}
