//! CLI definition

use clap::Parser;
use std::path::PathBuf;

/// Trafficlight - randomized two-phase traffic light simulation
#[derive(Debug, Parser)]
#[command(
    name = "trafficlight",
    about = "Simulate a traffic light and wait for green",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Number of waiter threads (overrides config)
    #[arg(short, long)]
    pub waiters: Option<usize>,

    /// Greens each waiter observes before exiting; runs forever when omitted
    #[arg(short = 'n', long)]
    pub cycles: Option<u32>,
}
