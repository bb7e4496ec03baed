//! Shared configuration types for helpdesk supervisors.

mod base;
mod delay;
mod simulator;
mod supervisor;

pub use base::ValidationError;
pub use delay::DelayConfig;
pub use simulator::SimulatorConfig;
pub use supervisor::SupervisorConfig;
