use helpdesk_config::shared::SupervisorConfig;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, warn};

use crate::concurrency::handoff::HandoffChannel;
use crate::concurrency::shutdown::ShutdownRx;
use crate::error::{ErrorKind, HelpdeskError, HelpdeskResult};
use crate::helpdesk_error;
use crate::observer::Observer;
use crate::room::WaitingRoom;
use crate::state::helper::HelperPhase;
use crate::types::{Event, ServiceStartedEvent};
use crate::workers::base::{Worker, WorkerHandle, sample_delay};

/// Internal state of [`HelperWorkerState`].
#[derive(Debug)]
pub struct HelperWorkerStateInner {
    /// Current phase of the helper's loop, this is the authoritative in-memory state.
    phase: HelperPhase,
    /// Number of services the helper performed.
    services_performed: u64,
}

impl HelperWorkerStateInner {
    /// Updates the helper's phase.
    pub fn set(&mut self, phase: HelperPhase) {
        debug!(
            from_phase = %self.phase,
            to_phase = %phase,
            "helper phase changing",
        );

        self.phase = phase;
    }

    /// Returns the helper's current phase.
    pub fn phase(&self) -> HelperPhase {
        self.phase
    }

    /// Returns how many services the helper performed.
    pub fn services_performed(&self) -> u64 {
        self.services_performed
    }

    fn record_performed_service(&mut self) {
        self.services_performed += 1;
    }
}

/// Thread-safe handle for helper worker state.
///
/// Besides the phase and counters, the state carries the advisory idle flag. The
/// flag may lag behind the helper's actual phase and exists for observability only,
/// real synchronization between seekers and the helper happens on the call wait.
#[derive(Debug, Clone)]
pub struct HelperWorkerState {
    inner: Arc<Mutex<HelperWorkerStateInner>>,
    idle: Arc<AtomicBool>,
}

impl HelperWorkerState {
    /// Creates a new helper worker state starting in the idle phase.
    pub fn new() -> Self {
        let inner = HelperWorkerStateInner {
            phase: HelperPhase::Idle,
            services_performed: 0,
        };

        Self {
            inner: Arc::new(Mutex::new(inner)),
            idle: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the advisory idle flag.
    ///
    /// The flag may be stale the moment it is read, no decision should be based on
    /// its value.
    pub fn is_idle(&self) -> bool {
        self.idle.load(Ordering::Relaxed)
    }

    fn set_idle(&self, idle: bool) {
        self.idle.store(idle, Ordering::Relaxed);
    }

    fn swap_idle(&self, idle: bool) -> bool {
        self.idle.swap(idle, Ordering::Relaxed)
    }
}

impl Default for HelperWorkerState {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for HelperWorkerState {
    type Target = Mutex<HelperWorkerStateInner>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Handle for monitoring and controlling the helper worker.
///
/// [`HelperWorkerHandle`] provides control over the helper worker that services
/// seekers one at a time. The handle enables waiting for worker completion and
/// checking final results.
#[derive(Debug)]
pub struct HelperWorkerHandle {
    state: HelperWorkerState,
    handle: Option<JoinHandle<HelpdeskResult<()>>>,
}

impl WorkerHandle<HelperWorkerState> for HelperWorkerHandle {
    fn state(&self) -> HelperWorkerState {
        self.state.clone()
    }

    /// Waits for the helper worker to complete execution.
    ///
    /// This method blocks until the helper worker finishes, either due to a shutdown
    /// signal or an error. It properly handles panics that might occur within the
    /// worker task.
    async fn wait(mut self) -> HelpdeskResult<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        handle.await.map_err(|err| {
            if err.is_cancelled() {
                helpdesk_error!(
                    ErrorKind::HelperWorkerCancelled,
                    "Helper worker was cancelled",
                    err
                )
            } else {
                helpdesk_error!(ErrorKind::HelperWorkerPanic, "Helper worker panicked", err)
            }
        })??;

        Ok(())
    }
}

/// Worker implementing the helper side of the helpdesk protocol.
///
/// [`HelperWorker`] is the single worker that services seekers. It sleeps while no
/// call is registered, wakes on the first call, frees the caller's waiting room seat
/// and performs one service at a time before going back to waiting.
#[derive(Debug)]
pub struct HelperWorker<O> {
    config: Arc<SupervisorConfig>,
    room: WaitingRoom,
    handoff: HandoffChannel,
    observer: O,
    state: HelperWorkerState,
    shutdown_rx: ShutdownRx,
}

impl<O> HelperWorker<O> {
    /// Creates a new helper worker with the given configuration and dependencies.
    pub fn new(
        config: Arc<SupervisorConfig>,
        room: WaitingRoom,
        handoff: HandoffChannel,
        observer: O,
        state: HelperWorkerState,
        shutdown_rx: ShutdownRx,
    ) -> Self {
        Self {
            config,
            room,
            handoff,
            observer,
            state,
            shutdown_rx,
        }
    }
}

impl<O> HelperWorker<O>
where
    O: Observer + Clone + Send + Sync + 'static,
{
    /// Runs the helper loop until shutdown is requested.
    ///
    /// The shutdown signal is only honored between service cycles. A cycle that was
    /// started by picking up a call always runs to completion, so no seeker is ever
    /// left stranded waiting for its service to finish.
    async fn run_helper_worker(mut self) -> HelpdeskResult<()> {
        loop {
            {
                let mut state = self.state.lock().await;
                state.set(HelperPhase::Idle);
            }

            // The idle flag is advisory, it describes the helper for observability
            // and must never gate a transition.
            if self.room.is_empty().await {
                self.state.set_idle(true);

                self.observer.observe(Event::HelperIdle).await?;
            }

            let call = self.handoff.wait_for_call(&mut self.shutdown_rx).await?;
            if call.should_shutdown() {
                info!("shutting down helper worker");
                break;
            }

            {
                let mut state = self.state.lock().await;
                state.set(HelperPhase::Woken);
            }

            // Picking up the call frees the seat of the seeker that is now entering
            // service. This is the single point where seat count and slot occupancy
            // are reconciled.
            self.room.release_seat().await?;

            if self.state.swap_idle(false) {
                self.observer.observe(Event::HelperWoken).await?;
            }

            // Sampled before awaiting since the generator cannot cross await points.
            let service_time = sample_delay(&self.config.service_time);

            {
                let mut state = self.state.lock().await;
                state.set(HelperPhase::Servicing);
            }

            self.observer
                .observe(Event::ServiceStarted(ServiceStartedEvent {
                    duration: service_time,
                }))
                .await?;

            // The service itself is not interruptible, a seeker is blocked on its
            // completion.
            tokio::time::sleep(service_time).await;

            self.observer.observe(Event::ServiceFinished).await?;

            {
                let mut state = self.state.lock().await;
                state.record_performed_service();
            }

            self.handoff.finish_service();
        }

        let pending_calls = self.handoff.pending_calls();
        if pending_calls > 0 {
            warn!(
                pending_calls,
                "helper worker stopped with calls still pending"
            );
        }

        Ok(())
    }
}

impl<O> Worker<HelperWorkerHandle, HelperWorkerState> for HelperWorker<O>
where
    O: Observer + Clone + Send + Sync + 'static,
{
    type Error = HelpdeskError;

    /// Spawns the helper worker and returns a handle for monitoring.
    ///
    /// The worker runs asynchronously and can be monitored through the returned
    /// handle.
    async fn start(self) -> Result<HelperWorkerHandle, Self::Error> {
        info!("starting helper worker");

        let state = self.state.clone();

        let helper_worker_span = tracing::info_span!(
            "helper_worker",
            supervisor_id = self.config.id,
        );
        let helper_worker = self
            .run_helper_worker()
            .instrument(helper_worker_span.or_current());

        let handle = tokio::spawn(helper_worker);

        Ok(HelperWorkerHandle {
            state,
            handle: Some(handle),
        })
    }
}
