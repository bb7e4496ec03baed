use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::ops::Deref;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::error::{ErrorKind, HelpdeskResult};
use crate::helpdesk_error;
use crate::types::SeekerId;
use crate::workers::seeker::{SeekerWorkerHandle, SeekerWorkerState};

/// Internal state for [`SeekerWorkerPool`].
#[derive(Debug)]
pub struct SeekerWorkerPoolInner {
    /// Currently active seeker workers indexed by seeker ID.
    active: HashMap<SeekerId, SeekerWorkerHandle>,
    /// Owns all spawned worker tasks.
    join_set: JoinSet<(SeekerId, HelpdeskResult<()>)>,
}

impl SeekerWorkerPoolInner {
    /// Creates a new empty seeker worker pool inner state.
    fn new() -> Self {
        Self {
            active: HashMap::new(),
            join_set: JoinSet::new(),
        }
    }

    /// Spawns and inserts a worker into the pool.
    ///
    /// If a worker for the seeker already exists and is still running, logs a
    /// warning and skips insertion.
    fn spawn<F>(&mut self, seeker_id: SeekerId, state: SeekerWorkerState, future: F)
    where
        F: Future<Output = HelpdeskResult<()>> + Send + 'static,
    {
        match self.active.entry(seeker_id) {
            Entry::Vacant(entry) => {
                let abort_handle = self.join_set.spawn(async move {
                    let result = future.await;
                    (seeker_id, result)
                });

                let handle = SeekerWorkerHandle::new(seeker_id, state, abort_handle);
                entry.insert(handle);

                debug!(%seeker_id, "spawned worker in pool");
            }
            Entry::Occupied(entry) => {
                if entry.get().is_finished() {
                    let abort_handle = self.join_set.spawn(async move {
                        let result = future.await;
                        (seeker_id, result)
                    });

                    let handle = SeekerWorkerHandle::new(seeker_id, state, abort_handle);
                    entry.remove();
                    self.active.insert(seeker_id, handle);

                    debug!(%seeker_id, "replaced finished worker in pool");
                } else {
                    warn!(%seeker_id, "worker already exists in pool and is still running");
                }
            }
        }
    }

    /// Retrieves the state handle for an active worker by seeker ID.
    ///
    /// Returns `None` if no worker exists for the seeker or if the worker has
    /// finished.
    fn get_active_worker_state(&self, seeker_id: SeekerId) -> Option<SeekerWorkerState> {
        let handle = self.active.get(&seeker_id)?;

        // Check if the worker is still running.
        if handle.is_finished() {
            return None;
        }

        Some(handle.state())
    }
}

/// Pool for managing the seeker workers of one supervisor.
///
/// [`SeekerWorkerPool`] owns the tasks of all spawned seeker workers, tracks their
/// handles and collects their results when the supervisor drains the pool during
/// shutdown.
#[derive(Debug, Clone)]
pub struct SeekerWorkerPool {
    inner: Arc<Mutex<SeekerWorkerPoolInner>>,
}

impl SeekerWorkerPool {
    /// Creates a new empty seeker worker pool.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SeekerWorkerPoolInner::new())),
        }
    }

    /// Spawns and inserts a worker into the pool.
    pub async fn spawn<F>(&self, seeker_id: SeekerId, state: SeekerWorkerState, future: F)
    where
        F: Future<Output = HelpdeskResult<()>> + Send + 'static,
    {
        let mut inner = self.inner.lock().await;
        inner.spawn(seeker_id, state, future);
    }

    /// Retrieves the state handle for an active worker by seeker ID.
    pub async fn get_active_worker_state(&self, seeker_id: SeekerId) -> Option<SeekerWorkerState> {
        let inner = self.inner.lock().await;
        inner.get_active_worker_state(seeker_id)
    }

    /// Waits for all active seeker workers to complete.
    ///
    /// This method blocks until all workers in the pool have finished their loops.
    /// If any workers encounter errors, those errors are collected and returned.
    pub async fn wait_all(&self) -> HelpdeskResult<()> {
        let mut errors = Vec::new();

        loop {
            let result = {
                let mut inner = self.inner.lock().await;
                inner.join_set.join_next().await
            };

            let Some(result) = result else {
                // JoinSet is empty, all workers have completed.
                break;
            };

            match result {
                Ok((seeker_id, worker_result)) => {
                    // Remove from active map.
                    let mut inner = self.inner.lock().await;
                    inner.active.remove(&seeker_id);

                    if let Err(err) = worker_result {
                        error!(%seeker_id, error = %err, "worker completed with error");
                        errors.push(err);
                    }
                }
                Err(join_err) => {
                    if join_err.is_cancelled() {
                        debug!("worker task was cancelled");
                    } else {
                        errors.push(helpdesk_error!(
                            ErrorKind::SeekerWorkerPanic,
                            "Seeker worker panicked",
                            join_err
                        ));
                    }
                }
            }
        }

        // Clean up any remaining entries in active map (shouldn't happen normally).
        {
            let mut inner = self.inner.lock().await;
            inner.active.clear();
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.into())
        }
    }
}

impl Default for SeekerWorkerPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for SeekerWorkerPool {
    type Target = Mutex<SeekerWorkerPoolInner>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
