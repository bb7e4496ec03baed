//! Common types used throughout the helpdesk system.
//!
//! Re-exports the coordination event types and worker identifiers used across the
//! supervisor, the workers and the observers.

mod event;
mod worker;

pub use event::*;
pub use worker::*;
