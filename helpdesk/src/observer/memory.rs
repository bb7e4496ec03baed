use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::HelpdeskResult;
use crate::observer::Observer;
use crate::types::Event;

#[derive(Debug)]
struct Inner {
    events: Vec<Event>,
}

/// In-memory observer for testing and development purposes.
///
/// [`MemoryObserver`] stores all coordination events in memory, making it ideal for
/// testing supervisors, debugging coordination behavior, and development workflows.
/// All events are held in memory and will be lost when the process terminates.
///
/// # Examples
///
/// ```rust,no_run
/// use helpdesk::observer::memory::MemoryObserver;
/// use helpdesk::supervisor::Supervisor;
/// use helpdesk_config::shared::{DelayConfig, SupervisorConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // Create a memory observer for testing
/// let observer = MemoryObserver::new();
///
/// // Set up a basic supervisor configuration
/// let config = SupervisorConfig {
///     id: 1,
///     chair_count: 3,
///     seeker_count: 5,
///     service_slot_count: 1,
///     think_time: DelayConfig::new(1, 45),
///     service_time: DelayConfig::new(1, 15),
/// };
///
/// // Memory observers are perfect for integration tests
/// // as you can inspect the captured events afterward
/// let mut supervisor = Supervisor::new(config, observer.clone());
///
/// supervisor.start().await?;
/// // ... let the simulation run ...
/// supervisor.shutdown_and_wait().await?;
///
/// // Access captured events for verification
/// let events = observer.events().await;
///
/// println!("Captured {} events", events.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryObserver {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryObserver {
    /// Creates a new empty memory observer.
    ///
    /// The observer starts with no stored events and will accumulate them as the
    /// supervisor's workers make progress.
    pub fn new() -> Self {
        let inner = Inner { events: Vec::new() };

        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Returns a copy of all events stored in this observer.
    ///
    /// This method is useful for testing and verification of supervisor behavior.
    /// It provides access to all coordination events that have been observed since
    /// creation or the last clear operation.
    pub async fn events(&self) -> Vec<Event> {
        let inner = self.inner.lock().await;
        inner.events.clone()
    }

    /// Clears all stored events.
    ///
    /// This method is useful for resetting the observer state between tests or
    /// during development workflows.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.events.clear();
    }
}

impl Default for MemoryObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MemoryObserver {
    fn name() -> &'static str {
        "memory"
    }

    async fn observe(&self, event: Event) -> HelpdeskResult<()> {
        let mut inner = self.inner.lock().await;

        info!("observing event: {:?}", event);

        inner.events.push(event);

        Ok(())
    }
}
