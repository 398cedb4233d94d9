//! Error types for the simulator.

/// Errors raised by parameter validation and the terminal front end.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A parameter was non-finite or outside its documented domain.
    #[error("invalid {name}: {value} (expected {min} ..= {max})")]
    InvalidParameter {
        /// Name of the rejected parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },

    /// The pendulum configuration cannot produce a valid simulation.
    #[error("invalid pendulum configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },

    /// Reading input from or drawing to the terminal failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// The log file could not be set up.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// Checks that `value` is finite and lies in `min..=max`.
pub fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<f64, SimError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(SimError::InvalidParameter {
            name,
            value,
            min,
            max,
        })
    }
}
