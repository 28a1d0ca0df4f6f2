//! Error types surfaced to callers of the logging facade.
//!
//! Only misuse is ever visible: a broken configuration, access before
//! initialization, or an unknown severity name. Transport and environment
//! failures are absorbed inside the dispatcher.

use thiserror::Error;

use crate::config::validation::ValidationError;
use crate::sink::SinkError;

/// Errors returned by the logging facade.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// The configured handler kind is not one of the supported sinks.
    #[error("Log handler {0} not supported")]
    UnsupportedHandler(String),

    /// The configuration failed semantic validation.
    #[error("Invalid logger configuration: {0}")]
    InvalidConfig(String),

    /// A facade call happened before `facade::initialize`.
    #[error("Logger has not been initialized yet")]
    Uninitialized,

    /// A severity name outside the eight recognized levels.
    #[error("Unknown log level: {0}")]
    InvalidLevel(String),

    /// The sink could not be opened while constructing the dispatcher.
    #[error("Failed to open log sink: {0}")]
    Sink(#[from] SinkError),
}

impl LoggerError {
    /// Whether this error stems from the configuration rather than usage.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LoggerError::UnsupportedHandler(_) | LoggerError::InvalidConfig(_)
        )
    }
}

impl From<Vec<ValidationError>> for LoggerError {
    fn from(errors: Vec<ValidationError>) -> Self {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        LoggerError::InvalidConfig(joined)
    }
}

/// Result type for facade operations.
pub type LoggerResult<T> = Result<T, LoggerError>;
