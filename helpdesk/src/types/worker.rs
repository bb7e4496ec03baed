use std::fmt;

/// Identifier of a seeker worker within a single supervisor.
///
/// Seeker ids exist for logging and per-worker statistics. The coordination protocol
/// itself treats all seekers as interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeekerId(pub u16);

impl fmt::Display for SeekerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
