use serde::{Deserialize, Serialize};

use crate::shared::{DelayConfig, ValidationError};

/// Configuration for a helpdesk supervisor.
///
/// Contains all settings required to run one supervisor: the waiting room
/// capacity, the number of seeker workers contending for it, the number of
/// concurrent service slots, and the timing bounds for worker think time and
/// helper service time.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SupervisorConfig {
    /// The unique identifier for this supervisor.
    ///
    /// The id is carried on worker tracing spans so that log lines from
    /// multiple supervisors in one process can be told apart.
    pub id: u64,
    /// Number of chairs in the waiting room.
    ///
    /// Zero is allowed and means every reservation attempt is rejected.
    #[serde(default = "default_chair_count")]
    pub chair_count: u16,
    /// Number of seeker workers to spawn.
    #[serde(default = "default_seeker_count")]
    pub seeker_count: u16,
    /// Number of seekers that can be admitted into service concurrently.
    #[serde(default = "default_service_slot_count")]
    pub service_slot_count: u16,
    /// Bounds for the randomized think time between a seeker's visits.
    #[serde(default = "default_think_time")]
    pub think_time: DelayConfig,
    /// Bounds for the randomized duration of one service.
    #[serde(default = "default_service_time")]
    pub service_time: DelayConfig,
}

impl SupervisorConfig {
    /// Default number of chairs in the waiting room.
    pub const DEFAULT_CHAIR_COUNT: u16 = 3;

    /// Default number of seeker workers.
    pub const DEFAULT_SEEKER_COUNT: u16 = 5;

    /// Default number of concurrent service slots.
    pub const DEFAULT_SERVICE_SLOT_COUNT: u16 = 1;

    /// Default think time bounds: 1 to 45 milliseconds.
    pub const DEFAULT_THINK_TIME: DelayConfig = DelayConfig::new(1, 45);

    /// Default service time bounds: 1 to 15 milliseconds.
    pub const DEFAULT_SERVICE_TIME: DelayConfig = DelayConfig::new(1, 15);

    /// Validates supervisor configuration settings.
    ///
    /// Ensures worker and slot counts are non-zero and delay bounds are ordered.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.seeker_count == 0 {
            return Err(ValidationError::InvalidFieldValue {
                field: "seeker_count".to_string(),
                constraint: "must be greater than 0".to_string(),
            });
        }

        if self.service_slot_count == 0 {
            return Err(ValidationError::InvalidFieldValue {
                field: "service_slot_count".to_string(),
                constraint: "must be greater than 0".to_string(),
            });
        }

        self.think_time.validate()?;
        self.service_time.validate()?;

        Ok(())
    }
}

fn default_chair_count() -> u16 {
    SupervisorConfig::DEFAULT_CHAIR_COUNT
}

fn default_seeker_count() -> u16 {
    SupervisorConfig::DEFAULT_SEEKER_COUNT
}

fn default_service_slot_count() -> u16 {
    SupervisorConfig::DEFAULT_SERVICE_SLOT_COUNT
}

fn default_think_time() -> DelayConfig {
    SupervisorConfig::DEFAULT_THINK_TIME
}

fn default_service_time() -> DelayConfig {
    SupervisorConfig::DEFAULT_SERVICE_TIME
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_defaults() -> SupervisorConfig {
        SupervisorConfig {
            id: 1,
            chair_count: default_chair_count(),
            seeker_count: default_seeker_count(),
            service_slot_count: default_service_slot_count(),
            think_time: default_think_time(),
            service_time: default_service_time(),
        }
    }

    #[test]
    fn test_defaults() {
        let config = config_with_defaults();
        assert_eq!(config.chair_count, 3);
        assert_eq!(config.seeker_count, 5);
        assert_eq!(config.service_slot_count, 1);
        assert_eq!(config.think_time, DelayConfig::new(1, 45));
        assert_eq!(config.service_time, DelayConfig::new(1, 15));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_chairs_is_allowed() {
        let config = SupervisorConfig {
            chair_count: 0,
            ..config_with_defaults()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_seekers() {
        let config = SupervisorConfig {
            seeker_count: 0,
            ..config_with_defaults()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_service_slots() {
        let config = SupervisorConfig {
            service_slot_count: 0,
            ..config_with_defaults()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_inverted_think_time() {
        let config = SupervisorConfig {
            think_time: DelayConfig::new(100, 1),
            ..config_with_defaults()
        };
        assert!(config.validate().is_err());
    }
}
