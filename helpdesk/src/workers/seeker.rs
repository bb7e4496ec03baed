use helpdesk_config::shared::SupervisorConfig;
use std::ops::Deref;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tracing::{Instrument, debug, info};

use crate::concurrency::handoff::HandoffChannel;
use crate::concurrency::shutdown::ShutdownRx;
use crate::error::HelpdeskResult;
use crate::observer::Observer;
use crate::room::WaitingRoom;
use crate::state::seeker::SeekerPhase;
use crate::types::{
    EnteredServiceEvent, Event, SeatGrantedEvent, SeatRejectedEvent, SeekerId, ServicedEvent,
};
use crate::workers::base::sample_delay;
use crate::workers::pool::SeekerWorkerPool;

/// Internal state of [`SeekerWorkerState`].
#[derive(Debug)]
pub struct SeekerWorkerStateInner {
    /// Identifier of the seeker whose state this structure tracks.
    seeker_id: SeekerId,
    /// Current phase of the seeker's loop, this is the authoritative in-memory state.
    phase: SeekerPhase,
    /// Number of times this seeker was turned away from a full waiting room.
    rejections: u64,
    /// Number of services this seeker completed.
    services_completed: u64,
}

impl SeekerWorkerStateInner {
    /// Updates the seeker's phase.
    pub fn set(&mut self, phase: SeekerPhase) {
        debug!(
            seeker_id = self.seeker_id.0,
            from_phase = %self.phase,
            to_phase = %phase,
            "seeker phase changing",
        );

        self.phase = phase;
    }

    /// Returns the seeker's current phase.
    pub fn phase(&self) -> SeekerPhase {
        self.phase
    }

    /// Returns how many times this seeker was turned away from a full waiting room.
    pub fn rejections(&self) -> u64 {
        self.rejections
    }

    /// Returns how many services this seeker completed.
    pub fn services_completed(&self) -> u64 {
        self.services_completed
    }

    fn record_rejection(&mut self) {
        self.rejections += 1;
    }

    fn record_completed_service(&mut self) {
        self.services_completed += 1;
    }
}

/// Thread-safe handle for seeker worker state.
///
/// [`SeekerWorkerState`] provides shared access to a seeker's phase and counters,
/// letting the supervisor and tests inspect progress while the worker runs.
#[derive(Debug, Clone)]
pub struct SeekerWorkerState {
    inner: Arc<Mutex<SeekerWorkerStateInner>>,
}

impl SeekerWorkerState {
    /// Creates a new seeker worker state starting in the working phase.
    fn new(seeker_id: SeekerId) -> Self {
        let inner = SeekerWorkerStateInner {
            seeker_id,
            phase: SeekerPhase::Working,
            rejections: 0,
            services_completed: 0,
        };

        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }
}

impl Deref for SeekerWorkerState {
    type Target = Mutex<SeekerWorkerStateInner>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Handle for monitoring seeker workers.
///
/// [`SeekerWorkerHandle`] exposes both the worker's state and completion status.
/// Completion results are collected by the pool that owns the worker task.
#[derive(Debug)]
pub struct SeekerWorkerHandle {
    seeker_id: SeekerId,
    state: SeekerWorkerState,
    abort_handle: AbortHandle,
}

impl SeekerWorkerHandle {
    /// Creates a new handle with the given seeker ID, state, and abort handle.
    pub fn new(seeker_id: SeekerId, state: SeekerWorkerState, abort_handle: AbortHandle) -> Self {
        Self {
            seeker_id,
            state,
            abort_handle,
        }
    }

    /// Returns the ID of the seeker this handle tracks.
    pub fn seeker_id(&self) -> SeekerId {
        self.seeker_id
    }

    /// Returns the worker's state.
    pub fn state(&self) -> SeekerWorkerState {
        self.state.clone()
    }

    /// Checks if the worker task has finished.
    pub fn is_finished(&self) -> bool {
        self.abort_handle.is_finished()
    }
}

/// Worker implementing the seeker side of the helpdesk protocol.
///
/// [`SeekerWorker`] alternates between working on its own and requesting service:
/// it reserves a seat in the waiting room, claims the service slot, calls the helper
/// and waits until the service is complete. A full waiting room sends the seeker
/// back to work until its next attempt.
#[derive(Debug)]
pub struct SeekerWorker<O> {
    config: Arc<SupervisorConfig>,
    seeker_id: SeekerId,
    room: WaitingRoom,
    handoff: HandoffChannel,
    observer: O,
    shutdown_rx: ShutdownRx,
}

impl<O> SeekerWorker<O> {
    /// Creates a new seeker worker with the given configuration and dependencies.
    pub fn new(
        config: Arc<SupervisorConfig>,
        seeker_id: SeekerId,
        room: WaitingRoom,
        handoff: HandoffChannel,
        observer: O,
        shutdown_rx: ShutdownRx,
    ) -> Self {
        Self {
            config,
            seeker_id,
            room,
            handoff,
            observer,
            shutdown_rx,
        }
    }
}

impl<O> SeekerWorker<O>
where
    O: Observer + Clone + Send + Sync + 'static,
{
    /// Spawns the seeker worker into the pool.
    ///
    /// This method creates the worker's state handle and spawns the seeker loop into
    /// the pool, which owns the task and collects its result.
    pub async fn spawn_into_pool(self, pool: &SeekerWorkerPool) {
        info!(seeker_id = self.seeker_id.0, "starting seeker worker");

        let state = SeekerWorkerState::new(self.seeker_id);
        let seeker_id = self.seeker_id;

        let seeker_worker_span = tracing::info_span!(
            "seeker_worker",
            supervisor_id = self.config.id,
            seeker_id = self.seeker_id.0,
        );

        let fut = self
            .run_seeker_worker(state.clone())
            .instrument(seeker_worker_span);

        pool.spawn(seeker_id, state, fut).await;
    }

    /// Runs the seeker loop until shutdown is requested.
    ///
    /// Shutdown is honored at the two blocking points that do not involve the helper:
    /// the work period and the wait for the service slot. Once the helper was called,
    /// the cycle always runs to completion so that the seat and slot accounting stays
    /// balanced.
    async fn run_seeker_worker(mut self, state: SeekerWorkerState) -> HelpdeskResult<()> {
        loop {
            {
                let mut state = state.lock().await;
                state.set(SeekerPhase::Working);
            }

            // Sampled before awaiting since the generator cannot cross await points.
            let think_time = sample_delay(&self.config.think_time);

            tokio::select! {
                biased;

                _ = self.shutdown_rx.wait_for_shutdown() => {
                    info!(seeker_id = self.seeker_id.0, "shutting down seeker worker while working");
                    return Ok(());
                }

                _ = tokio::time::sleep(think_time) => {}
            }

            {
                let mut state = state.lock().await;
                state.set(SeekerPhase::SeekingSeat);
            }

            let Some(seats_left) = self.room.try_reserve_seat().await else {
                {
                    let mut state = state.lock().await;
                    state.set(SeekerPhase::Rejected);
                    state.record_rejection();
                }

                self.observer
                    .observe(Event::SeatRejected(SeatRejectedEvent {
                        seeker_id: self.seeker_id,
                    }))
                    .await?;

                // No backoff here, the next attempt happens after the next work period.
                continue;
            };

            {
                let mut state = state.lock().await;
                state.set(SeekerPhase::SeatHeld);
            }

            self.observer
                .observe(Event::SeatGranted(SeatGrantedEvent {
                    seeker_id: self.seeker_id,
                    seats_left,
                }))
                .await?;

            {
                let mut state = state.lock().await;
                state.set(SeekerPhase::AwaitingSlot);
            }

            // The seat is reserved first and only then the slot is contended for.
            // Competing for the slot before sitting down would let the seat count and
            // the slot occupancy disagree.
            let slot = self.handoff.acquire_slot(&mut self.shutdown_rx).await?;
            if slot.should_shutdown() {
                // The seat was never handed over to the helper, so the seeker frees it
                // on the way out.
                self.room.release_seat().await?;

                info!(
                    seeker_id = self.seeker_id.0,
                    "shutting down seeker worker while waiting for the service slot"
                );
                return Ok(());
            }

            // Calling the helper right away leaves no window between claiming the slot
            // and announcing it.
            self.handoff.call_helper();

            {
                let mut state = state.lock().await;
                state.set(SeekerPhase::InService);
            }

            self.observer
                .observe(Event::EnteredService(EnteredServiceEvent {
                    seeker_id: self.seeker_id,
                }))
                .await?;

            // Once the helper was called it is guaranteed to finish this service before
            // stopping, so this wait does not race against shutdown.
            self.handoff.wait_for_service().await?;

            {
                let mut state = state.lock().await;
                state.set(SeekerPhase::Done);
                state.record_completed_service();
            }

            self.observer
                .observe(Event::Serviced(ServicedEvent {
                    seeker_id: self.seeker_id,
                }))
                .await?;

            self.handoff.release_slot();
        }
    }
}
