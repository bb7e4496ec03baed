use tracing::info;

use crate::error::HelpdeskResult;
use crate::observer::Observer;
use crate::types::Event;

/// Observer that narrates coordination events through the tracing stack.
///
/// [`LogObserver`] emits one human-readable log line per event, which makes it the
/// default choice for running simulations interactively. It keeps no state.
#[derive(Debug, Clone, Default)]
pub struct LogObserver;

impl LogObserver {
    /// Creates a new [`LogObserver`].
    pub fn new() -> Self {
        Self
    }
}

impl Observer for LogObserver {
    fn name() -> &'static str {
        "log"
    }

    async fn observe(&self, event: Event) -> HelpdeskResult<()> {
        match event {
            Event::SeatGranted(event) => {
                info!(
                    seeker_id = %event.seeker_id,
                    seats_left = event.seats_left,
                    "seeker took a seat in the waiting room"
                );
            }
            Event::SeatRejected(event) => {
                info!(
                    seeker_id = %event.seeker_id,
                    "seeker was turned away, the waiting room is full"
                );
            }
            Event::HelperIdle => {
                info!("helper has no one to help, going idle");
            }
            Event::HelperWoken => {
                info!("helper woken up by a call");
            }
            Event::ServiceStarted(event) => {
                info!(
                    duration_ms = event.duration.as_millis() as u64,
                    "helper started a service"
                );
            }
            Event::ServiceFinished => {
                info!("helper finished the service");
            }
            Event::EnteredService(event) => {
                info!(seeker_id = %event.seeker_id, "seeker entered the service slot");
            }
            Event::Serviced(event) => {
                info!(seeker_id = %event.seeker_id, "seeker was serviced, back to work");
            }
        }

        Ok(())
    }
}
