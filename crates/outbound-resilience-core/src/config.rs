//! Construction-time validation shared by the configuration builders.

use std::time::Duration;
use thiserror::Error;

/// Invalid configuration rejected before any call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A parameter is out of range.
    #[error("invalid argument '{parameter}': {message}")]
    Argument {
        parameter: &'static str,
        message: String,
    },

    /// A required parameter was not supplied.
    #[error("argument '{parameter}' must not be null or empty")]
    ArgumentNull { parameter: &'static str },

    /// A pipeline position was registered twice.
    #[error("Position '{position}' is already in use in the pipeline!")]
    PositionInUse { position: i32 },
}

impl ConfigError {
    pub fn argument(parameter: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Argument {
            parameter,
            message: message.into(),
        }
    }

    pub fn argument_null(parameter: &'static str) -> Self {
        ConfigError::ArgumentNull { parameter }
    }

    /// Name of the offending parameter, if the error refers to one.
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            ConfigError::Argument { parameter, .. } | ConfigError::ArgumentNull { parameter } => {
                Some(parameter)
            }
            ConfigError::PositionInUse { .. } => None,
        }
    }
}

/// Rejects zero counts.
pub fn ensure_positive(parameter: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::argument(parameter, "must be greater than zero"));
    }
    Ok(())
}

/// Rejects zero durations.
pub fn ensure_non_zero(parameter: &'static str, value: Duration) -> Result<(), ConfigError> {
    if value.is_zero() {
        return Err(ConfigError::argument(parameter, "must be greater than zero"));
    }
    Ok(())
}
