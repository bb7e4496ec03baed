use std::fmt;
use std::time::Duration;

use crate::types::SeekerId;

/// A seeker reserved a seat in the waiting room.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatGrantedEvent {
    /// ID of the seeker that reserved the seat.
    pub seeker_id: SeekerId,
    /// Number of seats still free after the reservation.
    pub seats_left: u16,
}

/// A seeker found the waiting room full and left without a seat.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatRejectedEvent {
    /// ID of the seeker that was turned away.
    pub seeker_id: SeekerId,
}

/// The helper started servicing a seeker.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceStartedEvent {
    /// How long the service will take.
    pub duration: Duration,
}

/// A seeker entered the service slot.
#[derive(Debug, Clone, PartialEq)]
pub struct EnteredServiceEvent {
    /// ID of the seeker that claimed the service slot.
    pub seeker_id: SeekerId,
}

/// A seeker collected its completed service and left the service slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ServicedEvent {
    /// ID of the seeker that was serviced.
    pub seeker_id: SeekerId,
}

/// Represents a single coordination event in the helpdesk system.
///
/// [`Event`] encapsulates every observable state change in the interaction between
/// seekers, the waiting room and the helper. Events from the helper's side carry no
/// seeker id since the helper services whoever occupies the service slot, without
/// knowing who that is.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A seeker reserved a seat in the waiting room.
    SeatGranted(SeatGrantedEvent),
    /// A seeker found the waiting room full and left.
    SeatRejected(SeatRejectedEvent),
    /// The helper found the waiting room empty and went idle.
    HelperIdle,
    /// The helper was woken from idle by a seeker's call.
    HelperWoken,
    /// The helper started a service.
    ServiceStarted(ServiceStartedEvent),
    /// The helper finished a service.
    ServiceFinished,
    /// A seeker entered the service slot.
    EnteredService(EnteredServiceEvent),
    /// A seeker was serviced and left the service slot.
    Serviced(ServicedEvent),
}

impl Event {
    /// Returns the [`EventType`] that corresponds to this event.
    ///
    /// This provides a lightweight way to identify the event type without
    /// pattern matching on the full event structure.
    pub fn event_type(&self) -> EventType {
        self.into()
    }

    /// Returns the seeker this event belongs to, if any.
    ///
    /// Events emitted from the helper's side are not associated with a specific
    /// seeker and return [`None`].
    pub fn seeker_id(&self) -> Option<SeekerId> {
        match self {
            Event::SeatGranted(event) => Some(event.seeker_id),
            Event::SeatRejected(event) => Some(event.seeker_id),
            Event::EnteredService(event) => Some(event.seeker_id),
            Event::Serviced(event) => Some(event.seeker_id),
            _ => None,
        }
    }
}

/// Classification of helpdesk coordination event types.
///
/// [`EventType`] provides a lightweight enumeration of possible events without
/// carrying the associated data. This is useful for filtering and counting
/// events based on type alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A seat reservation succeeded.
    SeatGranted,
    /// A seat reservation was turned down.
    SeatRejected,
    /// The helper went idle.
    HelperIdle,
    /// The helper was woken from idle.
    HelperWoken,
    /// A service started.
    ServiceStarted,
    /// A service finished.
    ServiceFinished,
    /// A seeker entered the service slot.
    EnteredService,
    /// A seeker left the service slot.
    Serviced,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SeatGranted => write!(f, "SeatGranted"),
            Self::SeatRejected => write!(f, "SeatRejected"),
            Self::HelperIdle => write!(f, "HelperIdle"),
            Self::HelperWoken => write!(f, "HelperWoken"),
            Self::ServiceStarted => write!(f, "ServiceStarted"),
            Self::ServiceFinished => write!(f, "ServiceFinished"),
            Self::EnteredService => write!(f, "EnteredService"),
            Self::Serviced => write!(f, "Serviced"),
        }
    }
}

impl From<&Event> for EventType {
    fn from(event: &Event) -> Self {
        match event {
            Event::SeatGranted(_) => EventType::SeatGranted,
            Event::SeatRejected(_) => EventType::SeatRejected,
            Event::HelperIdle => EventType::HelperIdle,
            Event::HelperWoken => EventType::HelperWoken,
            Event::ServiceStarted(_) => EventType::ServiceStarted,
            Event::ServiceFinished => EventType::ServiceFinished,
            Event::EnteredService(_) => EventType::EnteredService,
            Event::Serviced(_) => EventType::Serviced,
        }
    }
}

impl From<Event> for EventType {
    fn from(event: Event) -> Self {
        (&event).into()
    }
}
