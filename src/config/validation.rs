//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (chunk size fits a datagram)
//! - Reject cookie names a browser would not send back
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LoggerConfig → Result<(), Vec<ValidationError>>
//! - The handler kind is checked when the sink is built, so an unsupported
//!   handler surfaces as its own error

use thiserror::Error;

use crate::config::schema::{HandlerKind, LoggerConfig};

/// Largest UDP payload minus the GELF chunk header.
pub const MAX_CHUNK_SIZE: usize = 65_507 - 12;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("session cookie name must not be empty")]
    EmptyCookieName,

    #[error("session cookie name {0:?} contains characters not allowed in a cookie")]
    InvalidCookieName(String),

    #[error("gelf chunk size {0} must be between 1 and {max}", max = MAX_CHUNK_SIZE)]
    ChunkSize(usize),

    #[error("gelf collector address must not be empty")]
    EmptyCollector,

    #[error("logs directory must not be empty")]
    EmptyLogsDirectory,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &LoggerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let name = &config.session_cookie_name;
    if name.is_empty() {
        errors.push(ValidationError::EmptyCookieName);
    } else if !name.bytes().all(is_cookie_token) {
        errors.push(ValidationError::InvalidCookieName(name.clone()));
    }

    if config.gelf.chunk_size == 0 || config.gelf.chunk_size > MAX_CHUNK_SIZE {
        errors.push(ValidationError::ChunkSize(config.gelf.chunk_size));
    }

    // Only the network handler talks to a collector.
    let network = matches!(config.handler_kind(), Ok(HandlerKind::Network));
    if network && config.gelf.address.trim().is_empty() {
        errors.push(ValidationError::EmptyCollector);
    }

    if config.file.directory.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyLogsDirectory);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// RFC 6265 token characters.
fn is_cookie_token(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}
