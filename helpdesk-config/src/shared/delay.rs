use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Bounds for a randomized delay, in milliseconds.
///
/// Workers sample a uniform duration in `min_ms..=max_ms` each time they
/// think or service, so consecutive cycles take varying amounts of time.
/// Setting both bounds to the same value makes the delay deterministic, and
/// zero disables it entirely.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DelayConfig {
    /// Minimum delay in milliseconds.
    pub min_ms: u64,
    /// Maximum delay in milliseconds.
    pub max_ms: u64,
}

impl DelayConfig {
    /// Creates a delay bounded by `min_ms..=max_ms`.
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// Validates delay bounds.
    ///
    /// Ensures min_ms does not exceed max_ms.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_ms > self.max_ms {
            return Err(ValidationError::InvalidFieldValue {
                field: "min_ms".to_string(),
                constraint: "must be <= max_ms".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_bounds() {
        assert!(DelayConfig::new(1, 45).validate().is_ok());
        assert!(DelayConfig::new(10, 10).validate().is_ok());
        assert!(DelayConfig::new(0, 0).validate().is_ok());
    }

    #[test]
    fn test_validate_inverted_bounds() {
        assert!(DelayConfig::new(45, 1).validate().is_err());
    }
}
