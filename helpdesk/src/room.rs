use std::sync::Arc;

use tokio::sync::Mutex;

use crate::bail;
use crate::error::{ErrorKind, HelpdeskResult};

#[derive(Debug)]
struct WaitingRoomInner {
    free_seats: u16,
}

/// A fixed-capacity waiting room shared between seeker workers and the helper worker.
///
/// The room tracks how many seats are currently free. Seekers reserve a seat before
/// calling the helper and the helper frees a seat every time it picks up a call, so
/// the seat count is the single source of truth for room occupancy.
///
/// Cloning a [`WaitingRoom`] is cheap and all clones share the same seat count.
#[derive(Debug, Clone)]
pub struct WaitingRoom {
    capacity: u16,
    inner: Arc<Mutex<WaitingRoomInner>>,
}

impl WaitingRoom {
    /// Creates a new [`WaitingRoom`] with `capacity` seats, all of them free.
    pub fn new(capacity: u16) -> Self {
        Self {
            capacity,
            inner: Arc::new(Mutex::new(WaitingRoomInner {
                free_seats: capacity,
            })),
        }
    }

    /// Tries to reserve one seat without waiting.
    ///
    /// Returns the number of seats still free after the reservation, or [`None`]
    /// when the room is full. A full room is an expected outcome, not an error.
    pub async fn try_reserve_seat(&self) -> Option<u16> {
        let mut inner = self.inner.lock().await;

        if inner.free_seats == 0 {
            return None;
        }

        inner.free_seats -= 1;

        Some(inner.free_seats)
    }

    /// Frees one previously reserved seat and returns the updated free seat count.
    ///
    /// Fails with [`ErrorKind::InvariantViolation`] when all seats are already free,
    /// since that means a release was not paired with a reservation. The seat count
    /// is left untouched in that case.
    pub async fn release_seat(&self) -> HelpdeskResult<u16> {
        let mut inner = self.inner.lock().await;

        if inner.free_seats == self.capacity {
            bail!(
                ErrorKind::InvariantViolation,
                "Waiting room seat released while all seats were free",
                format!(
                    "The waiting room has {} free seats out of {}, so there is no reservation to release",
                    inner.free_seats, self.capacity
                )
            );
        }

        inner.free_seats += 1;

        Ok(inner.free_seats)
    }

    /// Returns `true` when no seat is reserved.
    pub async fn is_empty(&self) -> bool {
        let inner = self.inner.lock().await;

        inner.free_seats == self.capacity
    }

    /// Returns the number of currently free seats.
    pub async fn free_seats(&self) -> u16 {
        let inner = self.inner.lock().await;

        inner.free_seats
    }

    /// Returns the total number of seats in the room.
    pub fn capacity(&self) -> u16 {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reserve_and_release_round_trip() {
        let room = WaitingRoom::new(3);

        assert_eq!(room.free_seats().await, 3);
        assert!(room.is_empty().await);

        assert_eq!(room.try_reserve_seat().await, Some(2));
        assert_eq!(room.try_reserve_seat().await, Some(1));
        assert!(!room.is_empty().await);

        assert_eq!(room.release_seat().await.unwrap(), 2);
        assert_eq!(room.release_seat().await.unwrap(), 3);
        assert!(room.is_empty().await);
    }

    #[tokio::test]
    async fn test_reserve_fails_when_room_is_full() {
        let room = WaitingRoom::new(1);

        assert_eq!(room.try_reserve_seat().await, Some(0));
        assert_eq!(room.try_reserve_seat().await, None);
        // The failed reservation must not consume a seat.
        assert_eq!(room.free_seats().await, 0);
    }

    #[tokio::test]
    async fn test_release_without_reservation_is_an_error() {
        let room = WaitingRoom::new(2);

        let err = room.release_seat().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
        assert_eq!(room.free_seats().await, 2);
    }

    #[tokio::test]
    async fn test_zero_capacity_room_rejects_everyone() {
        let room = WaitingRoom::new(0);

        assert!(room.is_empty().await);
        assert_eq!(room.try_reserve_seat().await, None);
    }

    #[tokio::test]
    async fn test_emptiness_check_does_not_mutate() {
        let room = WaitingRoom::new(2);

        for _ in 0..3 {
            assert!(room.is_empty().await);
            assert_eq!(room.free_seats().await, 2);
        }
    }
}
