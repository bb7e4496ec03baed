//! Counting handshake between seeker workers and the helper worker.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::concurrency::shutdown::{ShutdownResult, ShutdownRx};
use crate::error::{ErrorKind, HelpdeskResult};
use crate::helpdesk_error;

#[derive(Debug)]
struct HandoffChannelInner {
    /// Calls made by seated seekers that the helper has not picked up yet.
    helper_calls: Semaphore,
    /// Free positions in the service slot.
    slot_permits: Semaphore,
    /// Completed services that no seeker has collected yet.
    service_done: Semaphore,
}

/// The three-phase handshake that hands a seated seeker over to the helper.
///
/// All three signals are counting semaphores, so a signal raised while the other side
/// is not waiting yet is retained instead of lost. The protocol is:
///
/// 1. A seeker that holds a waiting room seat claims the service slot via
///    [`HandoffChannel::acquire_slot`].
/// 2. The seeker calls the helper via [`HandoffChannel::call_helper`]. The helper picks
///    the call up in [`HandoffChannel::wait_for_call`] and frees the seeker's waiting
///    room seat at that point.
/// 3. The helper announces the completed service via [`HandoffChannel::finish_service`].
///    The seeker collects it in [`HandoffChannel::wait_for_service`] and returns the
///    slot via [`HandoffChannel::release_slot`].
///
/// Since the slot signal starts with as many permits as there are service slots, at
/// most that many seekers can be between steps 1 and 3 at any point in time.
///
/// Cloning a [`HandoffChannel`] is cheap and all clones share the same signals.
#[derive(Debug, Clone)]
pub struct HandoffChannel {
    inner: Arc<HandoffChannelInner>,
}

impl HandoffChannel {
    /// Creates a new [`HandoffChannel`] with `service_slot_count` service slots.
    pub fn new(service_slot_count: u16) -> Self {
        Self {
            inner: Arc::new(HandoffChannelInner {
                helper_calls: Semaphore::new(0),
                slot_permits: Semaphore::new(service_slot_count as usize),
                service_done: Semaphore::new(0),
            }),
        }
    }

    /// Waits until a service slot is free and claims it, unless shutdown wins the race.
    ///
    /// Waiting seekers claim slots in the order in which they started waiting. A claimed
    /// slot must be returned with [`HandoffChannel::release_slot`] once the seeker has
    /// collected its completed service.
    pub async fn acquire_slot(
        &self,
        shutdown_rx: &mut ShutdownRx,
    ) -> HelpdeskResult<ShutdownResult<(), ()>> {
        let permit = tokio::select! {
            biased;
            _ = shutdown_rx.wait_for_shutdown() => {
                return Ok(ShutdownResult::Shutdown(()));
            }
            permit = self.inner.slot_permits.acquire() => permit,
        };

        match permit {
            Ok(permit) => {
                // The slot is handed back via `release_slot` at the end of the
                // handshake, not when this guard drops.
                permit.forget();

                Ok(ShutdownResult::Ok(()))
            }
            Err(err) => Err(helpdesk_error!(
                ErrorKind::HandoffFailure,
                "Service slot wait failed",
                source: err
            )),
        }
    }

    /// Returns a previously claimed service slot.
    pub fn release_slot(&self) {
        self.inner.slot_permits.add_permits(1);
    }

    /// Registers one call for the helper, waking it up if it is waiting.
    ///
    /// The call is counted, so calling while the helper is busy servicing another
    /// seeker is never lost.
    pub fn call_helper(&self) {
        self.inner.helper_calls.add_permits(1);
    }

    /// Waits until a seeker calls the helper, unless shutdown wins the race.
    ///
    /// Consumes exactly one registered call. The helper is expected to free one
    /// waiting room seat for every call it picks up.
    pub async fn wait_for_call(
        &self,
        shutdown_rx: &mut ShutdownRx,
    ) -> HelpdeskResult<ShutdownResult<(), ()>> {
        let permit = tokio::select! {
            biased;
            _ = shutdown_rx.wait_for_shutdown() => {
                return Ok(ShutdownResult::Shutdown(()));
            }
            permit = self.inner.helper_calls.acquire() => permit,
        };

        match permit {
            Ok(permit) => {
                permit.forget();

                Ok(ShutdownResult::Ok(()))
            }
            Err(err) => Err(helpdesk_error!(
                ErrorKind::HandoffFailure,
                "Helper call wait failed",
                source: err
            )),
        }
    }

    /// Announces one completed service to the seeker occupying the service slot.
    pub fn finish_service(&self) {
        self.inner.service_done.add_permits(1);
    }

    /// Waits until the helper has completed the service for this seeker.
    ///
    /// This wait does not race against shutdown. Once a seeker has called the helper,
    /// the helper is guaranteed to finish that service before it stops, so the wait is
    /// always bounded.
    pub async fn wait_for_service(&self) -> HelpdeskResult<()> {
        match self.inner.service_done.acquire().await {
            Ok(permit) => {
                permit.forget();

                Ok(())
            }
            Err(err) => Err(helpdesk_error!(
                ErrorKind::HandoffFailure,
                "Service completion wait failed",
                source: err
            )),
        }
    }

    /// Returns the number of registered calls the helper has not picked up yet.
    pub fn pending_calls(&self) -> usize {
        self.inner.helper_calls.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;
    use tokio::time::{sleep, timeout};

    use super::*;
    use crate::concurrency::shutdown::create_shutdown_channel;

    #[tokio::test]
    async fn test_call_made_while_helper_is_busy_is_not_lost() {
        let handoff = HandoffChannel::new(1);
        let (_shutdown_tx, mut shutdown_rx) = create_shutdown_channel();

        handoff.call_helper();
        handoff.call_helper();
        assert_eq!(handoff.pending_calls(), 2);

        let result = handoff.wait_for_call(&mut shutdown_rx).await.unwrap();
        assert!(!result.should_shutdown());
        assert_eq!(handoff.pending_calls(), 1);

        let result = handoff.wait_for_call(&mut shutdown_rx).await.unwrap();
        assert!(!result.should_shutdown());
        assert_eq!(handoff.pending_calls(), 0);
    }

    #[tokio::test]
    async fn test_slot_count_bounds_concurrent_claims() {
        let handoff = HandoffChannel::new(1);
        let (_shutdown_tx, mut shutdown_rx) = create_shutdown_channel();

        let result = handoff.acquire_slot(&mut shutdown_rx).await.unwrap();
        assert!(!result.should_shutdown());

        // The only slot is claimed, so the next attempt must wait.
        let blocked = timeout(
            Duration::from_millis(50),
            handoff.acquire_slot(&mut shutdown_rx),
        )
        .await;
        assert!(blocked.is_err());

        handoff.release_slot();

        let result = handoff.acquire_slot(&mut shutdown_rx).await.unwrap();
        assert!(!result.should_shutdown());
    }

    #[tokio::test]
    async fn test_acquire_slot_observes_shutdown() {
        let handoff = HandoffChannel::new(1);
        let (shutdown_tx, mut shutdown_rx) = create_shutdown_channel();

        shutdown_tx.shutdown().unwrap();

        // Shutdown wins even though a slot is free.
        let result = handoff.acquire_slot(&mut shutdown_rx).await.unwrap();
        assert!(result.should_shutdown());
    }

    #[tokio::test]
    async fn test_wait_for_call_observes_shutdown() {
        let handoff = HandoffChannel::new(1);
        let (shutdown_tx, mut shutdown_rx) = create_shutdown_channel();

        shutdown_tx.shutdown().unwrap();

        let result = handoff.wait_for_call(&mut shutdown_rx).await.unwrap();
        assert!(result.should_shutdown());
    }

    #[tokio::test]
    async fn test_completed_service_signal_is_retained() {
        let handoff = HandoffChannel::new(1);

        handoff.finish_service();

        handoff.wait_for_service().await.unwrap();
    }

    #[tokio::test]
    async fn test_waiting_seekers_claim_slots_in_arrival_order() {
        let handoff = HandoffChannel::new(0);
        let (_shutdown_tx, shutdown_rx) = create_shutdown_channel();
        let (claims_tx, mut claims_rx) = mpsc::unbounded_channel();

        for waiter in 0..3u8 {
            let handoff = handoff.clone();
            let mut shutdown_rx = shutdown_rx.clone();
            let claims_tx = claims_tx.clone();

            tokio::spawn(async move {
                handoff.acquire_slot(&mut shutdown_rx).await.unwrap();
                claims_tx.send(waiter).unwrap();
            });

            // Give the spawned task time to enter the wait queue before the next one.
            sleep(Duration::from_millis(20)).await;
        }

        for expected in 0..3u8 {
            handoff.release_slot();
            assert_eq!(claims_rx.recv().await, Some(expected));
        }
    }
}
