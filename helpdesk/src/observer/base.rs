use std::future::Future;

use crate::error::HelpdeskResult;
use crate::types::Event;

/// Trait for systems that can receive coordination events from helpdesk supervisors.
///
/// [`Observer`] implementations define what happens with the events emitted by seeker
/// and helper workers, for example logging them or collecting them for inspection.
///
/// Events are delivered from inside the workers' loops, so implementations should
/// return quickly and must handle concurrent calls safely since every worker delivers
/// its own events.
///
/// The trait also provides an optional [`Observer::shutdown`] method with a default
/// no-op implementation. Override this method if your observer requires cleanup or
/// bookkeeping when the supervisor shuts down.
pub trait Observer {
    /// Returns the name of the observer.
    fn name() -> &'static str;

    /// Propagates the shutdown signal to the observer.
    ///
    /// Override this method if the observer needs to perform cleanup or bookkeeping
    /// when the supervisor shuts down. The default implementation is a no-op.
    fn shutdown(&self) -> impl Future<Output = HelpdeskResult<()>> + Send {
        async { Ok(()) }
    }

    /// Consumes a single coordination event.
    ///
    /// Workers deliver events in the order in which they observe them, but events
    /// from different workers may interleave arbitrarily.
    fn observe(&self, event: Event) -> impl Future<Output = HelpdeskResult<()>> + Send;
}
