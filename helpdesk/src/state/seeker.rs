use std::fmt;

/// The phase a seeker worker is currently in.
///
/// Phases follow the seeker's loop: the seeker works on its own, tries to find a seat
/// in the waiting room, either gets rejected or sits down, waits for the service slot,
/// gets serviced and goes back to working.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SeekerPhase {
    /// Set while the seeker is working on its own, outside of the waiting room.
    Working,
    /// Set when the seeker walks up to the waiting room to reserve a seat.
    SeekingSeat,
    /// Set when the waiting room was full and the seeker left without a seat.
    ///
    /// A rejected seeker goes straight back to [`SeekerPhase::Working`] and tries
    /// again after its next work period.
    Rejected,
    /// Set when the seeker reserved a seat and is about to wait for the service slot.
    SeatHeld,
    /// Set while the seeker waits for the service slot to become free.
    AwaitingSlot,
    /// Set while the seeker occupies the service slot and is serviced by the helper.
    InService,
    /// Set when the service finished and the seeker is about to resume working.
    Done,
}

impl SeekerPhase {
    pub fn as_static_str(&self) -> &'static str {
        match self {
            SeekerPhase::Working => "working",
            SeekerPhase::SeekingSeat => "seeking_seat",
            SeekerPhase::Rejected => "rejected",
            SeekerPhase::SeatHeld => "seat_held",
            SeekerPhase::AwaitingSlot => "awaiting_slot",
            SeekerPhase::InService => "in_service",
            SeekerPhase::Done => "done",
        }
    }
}

impl fmt::Display for SeekerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_static_str())
    }
}
