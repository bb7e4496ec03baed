//! Helpdesk simulator service binary.
//!
//! Initializes and runs a helpdesk supervisor that coordinates seeker workers
//! contending for a bounded waiting room and a single helper worker servicing
//! them. Includes telemetry, error handling, and graceful shutdown capabilities.

use clap::Parser;
use helpdesk_config::shared::SimulatorConfig;
use helpdesk_telemetry::tracing::init_tracing;
use tracing::error;

use crate::config::load_simulator_config;
use crate::core::start_simulator_with_config;
use crate::error::{SimulatorError, SimulatorResult};

mod config;
mod core;
mod error;

/// Helpdesk simulator - runs seekers against a bounded waiting room.
#[derive(Parser, Debug)]
#[command(name = "helpdesk-simulator")]
#[command(about = "Runs a helpdesk simulation with a bounded waiting room")]
struct Args {
    /// Number of seeker workers, overriding the configured value
    #[arg(long)]
    seekers: Option<u16>,
}

/// Entry point for the simulator service.
///
/// Loads configuration, initializes tracing, starts the async runtime, and
/// launches the supervisor. Render a readable report on failure instead of the
/// default `Debug` panic output.
fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err.render_report());
        std::process::exit(1);
    }
}

fn run() -> SimulatorResult<()> {
    let args = Args::parse();

    // Load simulator config
    let simulator_config = load_simulator_config(args.seekers)?;

    // Initialize tracing
    let _log_flusher =
        init_tracing(env!("CARGO_BIN_NAME")).map_err(SimulatorError::config)?;

    // We start the runtime.
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(simulator_config))?;

    Ok(())
}

/// Main async entry point that starts the supervisor.
///
/// Launches the simulator with the provided configuration and logs any error
/// before propagating it.
async fn async_main(simulator_config: SimulatorConfig) -> SimulatorResult<()> {
    if let Err(err) = start_simulator_with_config(simulator_config).await {
        error!("{err}");

        return Err(err);
    }

    Ok(())
}
