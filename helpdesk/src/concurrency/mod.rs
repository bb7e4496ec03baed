//! Concurrency utilities for coordinating helpdesk workers.
//!
//! This module provides the concurrency primitives used throughout the helpdesk system
//! to coordinate seeker and helper workers, handle graceful shutdown, and hand seated
//! seekers over to the service slot without losing wakeups.
//!
//! # Coordination Patterns
//!
//! ## Graceful Shutdown
//!
//! The [`shutdown`] module implements a broadcast-based shutdown pattern where:
//! 1. A single shutdown signal can terminate multiple workers simultaneously
//! 2. Workers complete their current operations before terminating
//! 3. Resource cleanup happens in the correct order to prevent deadlocks
//!
//! ## Service Handoff
//!
//! The [`handoff`] module implements the counting handshake between seekers and
//! the helper:
//! - Seekers wait for a free service slot before calling the helper
//! - Calls are counted, so a call made while the helper is busy is never lost
//! - The helper signals each completed service back to exactly one seeker

pub mod handoff;
pub mod shutdown;
