use std::fmt;

/// The phase the helper worker is currently in.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HelperPhase {
    /// Set when the helper has no call to pick up and waits for one.
    Idle,
    /// Set when the helper picked up a call and is preparing the service.
    Woken,
    /// Set while the helper services a seeker in the service slot.
    Servicing,
}

impl HelperPhase {
    pub fn as_static_str(&self) -> &'static str {
        match self {
            HelperPhase::Idle => "idle",
            HelperPhase::Woken => "woken",
            HelperPhase::Servicing => "servicing",
        }
    }
}

impl fmt::Display for HelperPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_static_str())
    }
}
