//! Testing utilities for helpdesk supervisors.
//!
//! The utilities in this module make assertions on a running supervisor
//! deterministic: the observer wrapper records every event flowing out of the
//! workers, and tests wait with a timeout until the recorded stream satisfies a
//! condition instead of sleeping for arbitrary durations.

pub mod event;
pub mod notify;
pub mod supervisor;
pub mod test_observer_wrapper;
