use serde::{Deserialize, Serialize};

use crate::Config;
use crate::shared::{SupervisorConfig, ValidationError};

/// Complete configuration for the simulator service.
///
/// Aggregates all configuration required to run the simulator binary.
/// Typically loaded from configuration files at startup, with `APP_`-prefixed
/// environment variables layered on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Configuration for the supervisor the simulator runs.
    pub supervisor: SupervisorConfig,
}

impl SimulatorConfig {
    /// Validates the complete simulator configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.supervisor.validate()
    }
}

impl Config for SimulatorConfig {
    const LIST_PARSE_KEYS: &'static [&'static str] = &[];
}
