//! Telemetry initialization for helpdesk services.

pub mod tracing;
