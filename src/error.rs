use thiserror::Error;

/// Errors rejected when a simulation is constructed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Area size must be positive, got {0}")]
    NonPositiveAreaSize(f64),

    #[error("Simulation needs at least one agent")]
    EmptyPopulation,

    #[error("Move speed must be positive, got {0}")]
    NonPositiveSpeed(f64),

    #[error("Time step must be positive, got {0}")]
    NonPositiveTimeStep(f64),

    #[error("Maximum ticks per episode must be at least 1")]
    ZeroMaxTicks,

    #[error("Threshold `{name}` must lie in [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("Probability `{name}` must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("Range `{name}` must be positive, got {value}")]
    NonPositiveRange { name: &'static str, value: f64 },

    #[error("Proximity band {index} is invalid: {reason}")]
    InvalidBand { index: usize, reason: &'static str },

    #[error("Global conversion cadence must be at least 1 tick")]
    ZeroCadence,
}

/// Errors raised while parsing a raw policy output.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ActionError {
    #[error("Action must have {expected} components, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("Action component {index} is not finite: {value}")]
    NonFinite { index: usize, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_size_display() {
        let e = ConfigError::NonPositiveAreaSize(-1.0);
        assert_eq!(e.to_string(), "Area size must be positive, got -1");
    }

    #[test]
    fn threshold_display_names_field() {
        let e = ConfigError::ThresholdOutOfRange {
            name: "local_majority.threshold",
            value: 1.5,
        };
        assert_eq!(
            e.to_string(),
            "Threshold `local_majority.threshold` must lie in [0, 1], got 1.5"
        );
    }

    #[test]
    fn wrong_length_display() {
        let e = ActionError::WrongLength {
            expected: 2,
            actual: 3,
        };
        assert_eq!(e.to_string(), "Action must have 2 components, got 3");
    }
}
