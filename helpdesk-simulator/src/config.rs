use helpdesk_config::load_config;
use helpdesk_config::shared::SimulatorConfig;

use crate::error::{SimulatorError, SimulatorResult};

/// Loads and validates the simulator configuration.
///
/// Uses the standard configuration loading mechanism from [`helpdesk_config`] and
/// validates the resulting [`SimulatorConfig`] before returning it. A seeker
/// count passed on the command line replaces the configured value before
/// validation runs.
pub fn load_simulator_config(seeker_count: Option<u16>) -> SimulatorResult<SimulatorConfig> {
    let mut config = load_config::<SimulatorConfig>().map_err(SimulatorError::config)?;

    if let Some(seeker_count) = seeker_count {
        config.supervisor.seeker_count = seeker_count;
    }

    config.validate().map_err(SimulatorError::config)?;

    Ok(config)
}
