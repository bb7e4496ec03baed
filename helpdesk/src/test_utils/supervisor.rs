use helpdesk_config::shared::{DelayConfig, SupervisorConfig};

use crate::observer::Observer;
use crate::supervisor::{Supervisor, SupervisorId};

/// Builder for creating test supervisors with configurable options.
///
/// This builder provides a fluent interface for constructing [`Supervisor`]
/// instances with custom configurations. All options have test-sized defaults,
/// so tests only specify the options they care about.
pub struct SupervisorBuilder<O> {
    supervisor_id: SupervisorId,
    observer: O,
    chair_count: u16,
    seeker_count: u16,
    service_slot_count: u16,
    think_time: DelayConfig,
    service_time: DelayConfig,
}

impl<O> SupervisorBuilder<O>
where
    O: Observer + Clone + Send + Sync + 'static,
{
    /// Creates a new supervisor builder with required parameters and default settings.
    ///
    /// # Default Settings
    ///
    /// * Chairs: 3
    /// * Seekers: 1
    /// * Service slots: 1
    /// * Think time: 1-5ms
    /// * Service time: 1-5ms
    pub fn new(supervisor_id: SupervisorId, observer: O) -> Self {
        Self {
            supervisor_id,
            observer,
            chair_count: 3,
            seeker_count: 1,
            service_slot_count: 1,
            think_time: DelayConfig::new(1, 5),
            service_time: DelayConfig::new(1, 5),
        }
    }

    /// Sets the number of chairs in the waiting room.
    pub fn with_chair_count(mut self, chair_count: u16) -> Self {
        self.chair_count = chair_count;
        self
    }

    /// Sets the number of seeker workers.
    pub fn with_seeker_count(mut self, seeker_count: u16) -> Self {
        self.seeker_count = seeker_count;
        self
    }

    /// Sets the number of concurrent service slots.
    pub fn with_service_slot_count(mut self, service_slot_count: u16) -> Self {
        self.service_slot_count = service_slot_count;
        self
    }

    /// Sets the bounds of the randomized think time.
    pub fn with_think_time(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.think_time = DelayConfig::new(min_ms, max_ms);
        self
    }

    /// Sets the bounds of the randomized service time.
    pub fn with_service_time(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.service_time = DelayConfig::new(min_ms, max_ms);
        self
    }

    /// Builds and returns the configured supervisor.
    pub fn build(self) -> Supervisor<O> {
        let config = SupervisorConfig {
            id: self.supervisor_id,
            chair_count: self.chair_count,
            seeker_count: self.seeker_count,
            service_slot_count: self.service_slot_count,
            think_time: self.think_time,
            service_time: self.service_time,
        };

        Supervisor::new(config, self.observer)
    }
}

/// Creates a supervisor with default test configuration.
///
/// This is a convenience wrapper around [`SupervisorBuilder`] for tests that only
/// need a single seeker and fast delays.
pub fn create_supervisor<O>(supervisor_id: SupervisorId, observer: O) -> Supervisor<O>
where
    O: Observer + Clone + Send + Sync + 'static,
{
    SupervisorBuilder::new(supervisor_id, observer).build()
}
