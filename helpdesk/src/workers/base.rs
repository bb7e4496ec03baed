use std::future::Future;
use std::time::Duration;

use helpdesk_config::shared::DelayConfig;
use rand::Rng;

use crate::error::HelpdeskResult;

/// Trait for background workers in the helpdesk system.
///
/// [`Worker`] defines the interface for starting the seeker and helper control loops.
/// Starting a worker hands back a handle that can be used to inspect its state and
/// to wait for it to finish.
///
/// The generic parameter `H` represents the handle type returned when the worker
/// starts, and `S` represents the state type accessible through the handle.
pub trait Worker<H, S>
where
    H: WorkerHandle<S>,
{
    /// Error type returned when worker startup fails.
    type Error;

    /// Starts the worker and returns a handle for monitoring its execution.
    ///
    /// This method begins background processing and returns immediately with a
    /// handle that can be used to monitor progress and wait for completion.
    fn start(self) -> impl Future<Output = Result<H, Self::Error>> + Send;
}

/// Handle for monitoring a running worker.
///
/// The handle stays valid after the worker completes, so its state can still be
/// inspected once the control loop has exited.
///
/// The generic parameter `S` represents the type of state accessible through this
/// handle.
pub trait WorkerHandle<S> {
    /// Returns the current state of the worker.
    ///
    /// The state is a snapshot and is independent of the worker's lifetime, holding
    /// it does not keep the worker alive.
    fn state(&self) -> S;

    /// Waits for the worker to complete and returns the final result.
    ///
    /// The handle is consumed by this operation.
    fn wait(self) -> impl Future<Output = HelpdeskResult<()>> + Send;
}

/// Samples a duration from the bounds in `delay`, inclusive on both ends.
///
/// The thread-local generator is not `Send`, so callers must sample before the next
/// await point instead of holding the generator across it.
pub(crate) fn sample_delay(delay: &DelayConfig) -> Duration {
    let millis = rand::thread_rng().gen_range(delay.min_ms..=delay.max_ms);

    Duration::from_millis(millis)
}
