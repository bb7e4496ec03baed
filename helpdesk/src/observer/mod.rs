//! Coordination event observers for helpdesk supervisors.
//!
//! This module provides the core [`Observer`] trait and implementations for consuming
//! the coordination events emitted by seeker and helper workers. Observers receive
//! every seat reservation, rejection, wakeup and service outcome as it happens.

mod base;
pub mod log;
pub mod memory;

pub use base::Observer;
