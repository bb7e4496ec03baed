use helpdesk_config::shared::SupervisorConfig;
use std::sync::Arc;
use tracing::{error, info};

use crate::bail;
use crate::concurrency::handoff::HandoffChannel;
use crate::concurrency::shutdown::{ShutdownTx, create_shutdown_channel};
use crate::error::{ErrorKind, HelpdeskResult};
use crate::observer::Observer;
use crate::room::WaitingRoom;
use crate::types::SeekerId;
use crate::workers::base::{Worker, WorkerHandle};
use crate::workers::helper::{HelperWorker, HelperWorkerHandle, HelperWorkerState};
use crate::workers::pool::SeekerWorkerPool;
use crate::workers::seeker::{SeekerWorker, SeekerWorkerState};

#[derive(Debug)]
enum SupervisorState {
    NotStarted,
    Started {
        helper_worker: HelperWorkerHandle,
        helper_shutdown_tx: ShutdownTx,
        pool: SeekerWorkerPool,
    },
}

pub type SupervisorId = u64;

/// Coordinates the workers of one helpdesk.
///
/// [`Supervisor`] owns the waiting room, the handoff channel and the shutdown
/// channels. It spawns the configured number of seeker workers plus exactly one
/// helper worker, and drains them in the right order on shutdown.
#[derive(Debug)]
pub struct Supervisor<O> {
    config: Arc<SupervisorConfig>,
    observer: O,
    room: WaitingRoom,
    handoff: HandoffChannel,
    helper_state: HelperWorkerState,
    state: SupervisorState,
    shutdown_tx: ShutdownTx,
}

impl<O> Supervisor<O>
where
    O: Observer + Clone + Send + Sync + 'static,
{
    pub fn new(config: SupervisorConfig, observer: O) -> Self {
        // The shutdown channel carries unit values since subscribers only care that
        // a signal was sent.
        //
        // The `shutdown_rx` is dropped here since every seeker worker extracts its
        // own receiver from the `shutdown_tx` via the `subscribe` method.
        let (shutdown_tx, _) = create_shutdown_channel();

        let room = WaitingRoom::new(config.chair_count);
        let handoff = HandoffChannel::new(config.service_slot_count);

        Self {
            config: Arc::new(config),
            observer,
            room,
            handoff,
            helper_state: HelperWorkerState::new(),
            state: SupervisorState::NotStarted,
            shutdown_tx,
        }
    }

    /// Returns the identifier of this supervisor.
    pub fn id(&self) -> SupervisorId {
        self.config.id
    }

    /// Returns a sender that can signal this supervisor's seeker workers to shut
    /// down.
    pub fn shutdown_tx(&self) -> ShutdownTx {
        self.shutdown_tx.clone()
    }

    /// Returns the waiting room shared by this supervisor's workers.
    pub fn waiting_room(&self) -> WaitingRoom {
        self.room.clone()
    }

    /// Returns the handoff channel shared by this supervisor's workers.
    pub fn handoff_channel(&self) -> HandoffChannel {
        self.handoff.clone()
    }

    /// Returns the helper worker's state.
    pub fn helper_state(&self) -> HelperWorkerState {
        self.helper_state.clone()
    }

    /// Retrieves the state handle of a running seeker worker.
    ///
    /// Returns `None` when the supervisor was not started or the worker already
    /// finished.
    pub async fn seeker_state(&self, seeker_id: SeekerId) -> Option<SeekerWorkerState> {
        let SupervisorState::Started { pool, .. } = &self.state else {
            return None;
        };

        pool.get_active_worker_state(seeker_id).await
    }

    /// Starts the helper worker and all seeker workers.
    ///
    /// Fails when called on a supervisor that was already started.
    pub async fn start(&mut self) -> HelpdeskResult<()> {
        if let SupervisorState::Started { .. } = self.state {
            bail!(
                ErrorKind::InvalidState,
                "Supervisor already started",
                format!("The supervisor with id {} was started twice", self.config.id)
            );
        }

        let free_seats = self.room.free_seats().await;
        info!(
            "starting supervisor with id {} with {} seekers and {} free seats",
            self.config.id, self.config.seeker_count, free_seats
        );

        // The helper gets its own shutdown channel so it can outlive the seekers
        // during shutdown and service every call that was already registered.
        let (helper_shutdown_tx, _) = create_shutdown_channel();

        // We create and start the helper worker.
        let helper_worker = HelperWorker::new(
            self.config.clone(),
            self.room.clone(),
            self.handoff.clone(),
            self.observer.clone(),
            self.helper_state.clone(),
            helper_shutdown_tx.subscribe(),
        )
        .start()
        .await?;

        // We create the seeker workers pool to manage all seeker workers in a
        // central place.
        let pool = SeekerWorkerPool::new();

        for seeker_index in 0..self.config.seeker_count {
            let seeker_worker = SeekerWorker::new(
                self.config.clone(),
                SeekerId(seeker_index),
                self.room.clone(),
                self.handoff.clone(),
                self.observer.clone(),
                self.shutdown_tx.subscribe(),
            );

            seeker_worker.spawn_into_pool(&pool).await;
        }

        self.state = SupervisorState::Started {
            helper_worker,
            helper_shutdown_tx,
            pool,
        };

        Ok(())
    }

    /// Waits for all workers to finish after shutdown was signaled.
    ///
    /// Seeker workers are drained first. Only once every seeker has exited is the
    /// helper told to stop, which guarantees that every call registered by a seeker
    /// is serviced and no seeker is left waiting forever.
    pub async fn wait(self) -> HelpdeskResult<()> {
        let SupervisorState::Started {
            helper_worker,
            helper_shutdown_tx,
            pool,
        } = self.state
        else {
            info!("supervisor was not started, nothing to wait for");

            return Ok(());
        };

        info!("waiting for seeker workers to complete");

        let mut errors = vec![];

        // We first wait for the seeker workers to finish. The helper must keep
        // running while they drain, since a seeker that already called the helper is
        // blocked until its service completes.
        let seeker_workers_result = pool.wait_all().await;
        if let Err(err) = seeker_workers_result {
            // We naively use the `kinds` as number of errors.
            let errors_number = err.kinds().len();

            errors.push(err);

            info!("{} seeker workers failed with an error", errors_number);
        }

        info!("waiting for helper worker to complete");

        // With no seekers left, no new calls can arrive and the helper can be
        // stopped.
        //
        // If we fail to send the shutdown signal, we are not going to capture the
        // error since it means the helper is not running anymore, which is fine.
        let _ = helper_shutdown_tx.shutdown();

        let helper_worker_result = helper_worker.wait().await;
        if let Err(err) = helper_worker_result {
            errors.push(err);

            info!("helper worker completed with an error");
        }

        // The observer is released last, when no worker can deliver events anymore.
        if let Err(err) = self.observer.shutdown().await {
            errors.push(err);
        }

        if !errors.is_empty() {
            return Err(errors.into());
        }

        Ok(())
    }

    /// Signals all seeker workers to shut down.
    pub fn shutdown(&self) {
        info!("trying to shut down the supervisor");

        if let Err(err) = self.shutdown_tx.shutdown() {
            error!("failed to send shutdown signal to the supervisor: {}", err);
            return;
        }

        info!("shut down signal successfully sent to all seeker workers");
    }

    /// Signals shutdown and waits for all workers to finish.
    pub async fn shutdown_and_wait(self) -> HelpdeskResult<()> {
        self.shutdown();
        self.wait().await
    }
}
