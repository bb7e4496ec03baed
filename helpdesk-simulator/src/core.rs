use helpdesk::observer::Observer;
use helpdesk::observer::log::LogObserver;
use helpdesk::supervisor::Supervisor;
use helpdesk_config::shared::{DelayConfig, SimulatorConfig, SupervisorConfig};
use tokio::signal::unix::{SignalKind, signal};
use tracing::{debug, info, warn};

use crate::error::SimulatorResult;

/// Starts the simulator service with the provided configuration.
///
/// Creates the supervisor with a logging observer and runs it until a shutdown
/// signal arrives or a worker fails.
pub async fn start_simulator_with_config(
    simulator_config: SimulatorConfig,
) -> SimulatorResult<()> {
    info!("starting simulator service");

    log_config(&simulator_config);

    let observer = LogObserver::new();
    let supervisor = Supervisor::new(simulator_config.supervisor, observer);

    start_supervisor(supervisor).await?;

    info!("simulator service completed");

    Ok(())
}

fn log_config(config: &SimulatorConfig) {
    log_supervisor_config(&config.supervisor);
}

fn log_supervisor_config(config: &SupervisorConfig) {
    debug!(
        supervisor_id = config.id,
        chair_count = config.chair_count,
        seeker_count = config.seeker_count,
        service_slot_count = config.service_slot_count,
        "supervisor config"
    );
    log_delay_config("think_time", &config.think_time);
    log_delay_config("service_time", &config.service_time);
}

fn log_delay_config(name: &str, config: &DelayConfig) {
    debug!(
        min_ms = config.min_ms,
        max_ms = config.max_ms,
        "{name} config"
    );
}

/// Starts a supervisor and handles graceful shutdown signals.
///
/// Launches the supervisor, sets up signal handlers for SIGTERM and SIGINT,
/// and ensures proper cleanup on shutdown. The workers finish their current
/// handshakes before terminating.
#[tracing::instrument(skip(supervisor))]
async fn start_supervisor<O>(mut supervisor: Supervisor<O>) -> SimulatorResult<()>
where
    O: Observer + Clone + Send + Sync + 'static,
{
    // Start the supervisor.
    supervisor.start().await?;

    // Spawn a task to listen for shutdown signals and trigger shutdown.
    let shutdown_tx = supervisor.shutdown_tx();
    let shutdown_handle = tokio::spawn(async move {
        // Listen for SIGTERM, sent by orchestrators before SIGKILL during termination.
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("sigint (ctrl+c) received, shutting down supervisor");
            }
            _ = sigterm.recv() => {
                info!("sigterm received, shutting down supervisor");
            }
        }

        if let Err(e) = shutdown_tx.shutdown() {
            warn!(error = ?e, "failed to send shutdown signal");
            return;
        }

        info!("supervisor shutdown successfully")
    });

    // Wait for the supervisor to finish (either normally or via shutdown).
    let result = supervisor.wait().await;

    // Ensure the shutdown task is finished before returning.
    // If the supervisor finished before Ctrl+C, we want to abort the shutdown task.
    // If Ctrl+C was pressed, the shutdown task will have already triggered shutdown.
    // We don't care about the result of the shutdown_handle, but we should abort it if it's still running.
    shutdown_handle.abort();
    let _ = shutdown_handle.await;

    // Propagate any supervisor error as simulator error.
    result?;

    Ok(())
}
