//! Error types for blazemap.

use thiserror::Error;

/// Result type alias using BlazeError.
pub type BlazeResult<T> = Result<T, BlazeError>;

/// Primary error type for heatmap operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BlazeError {
    // === Configuration Errors ===
    #[error("Invalid value for option '{option}': {message}")]
    InvalidConfiguration { option: String, message: String },

    /// Malformed gradient: too few stops, a key outside [0, 1] or a color outside
    /// [0, 0xFFFFFFFF]. This is an invalid-configuration error;
    /// [`BlazeError::is_configuration`] is true for it.
    #[error("Invalid color gradient: {0}")]
    InvalidGradient(String),

    // === Resource Errors ===
    #[error("Point capacity exceeded: {requested} points requested, capacity is {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    #[error("Heatmap has been destroyed")]
    Disposed,

    #[error("Execution environment unavailable: {0}")]
    ExecutionEnvironmentUnavailable(String),
}

impl BlazeError {
    /// Shorthand for an out-of-range option.
    pub fn invalid(option: impl Into<String>, message: impl Into<String>) -> Self {
        BlazeError::InvalidConfiguration {
            option: option.into(),
            message: message.into(),
        }
    }

    /// True for every error raised while validating caller-supplied configuration.
    ///
    /// Malformed gradients are a kind of invalid configuration; they keep their own
    /// variant so the message can point at the offending stop.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BlazeError::InvalidConfiguration { .. } | BlazeError::InvalidGradient(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_errors_are_configuration_errors() {
        assert!(BlazeError::InvalidGradient("x".into()).is_configuration());
        assert!(BlazeError::invalid("radius", "must be positive").is_configuration());
        assert!(!BlazeError::Disposed.is_configuration());
        assert!(!BlazeError::CapacityExceeded { requested: 3, capacity: 2 }.is_configuration());
    }

    #[test]
    fn test_error_messages() {
        let err = BlazeError::invalid("radius", "must be positive, got -1");
        assert_eq!(
            err.to_string(),
            "Invalid value for option 'radius': must be positive, got -1"
        );
        let err = BlazeError::CapacityExceeded { requested: 5, capacity: 4 };
        assert!(err.to_string().contains("capacity is 4"));
    }
}
