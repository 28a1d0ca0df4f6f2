//! Process-wide dispatcher for the application boundary.
//!
//! # Responsibilities
//! - Hold one dispatcher for the whole process, first initialization wins
//! - Offer free functions per severity for code without a dispatcher handle
//!
//! # Design Decisions
//! - Library code should receive a `Dispatcher` explicitly; this slot is for
//!   the outermost layer (binaries, glue code)
//! - Initialization is a mutex-guarded check-and-set so concurrent first
//!   calls cannot build two sinks
//! - A failed construction leaves the slot empty

use std::sync::{Mutex, OnceLock, PoisonError};

use serde_json::Value;

use crate::config::LoggerConfig;
use crate::dispatcher::Dispatcher;
use crate::error::{LoggerError, LoggerResult};
use crate::logger::Level;

static DISPATCHER: OnceLock<Dispatcher> = OnceLock::new();
static INIT: Mutex<()> = Mutex::new(());

/// Build and store the process dispatcher.
///
/// Later calls return the stored dispatcher and ignore their arguments.
pub fn initialize(facility: &str, config: LoggerConfig) -> LoggerResult<Dispatcher> {
    if let Some(existing) = DISPATCHER.get() {
        return Ok(existing.clone());
    }

    let _guard = INIT.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(existing) = DISPATCHER.get() {
        tracing::debug!(
            facility = %facility,
            active = %existing.facility(),
            "Logger already initialized"
        );
        return Ok(existing.clone());
    }

    let dispatcher = Dispatcher::new(facility, config)?;
    Ok(DISPATCHER.get_or_init(|| dispatcher).clone())
}

/// The process dispatcher.
pub fn current() -> LoggerResult<Dispatcher> {
    DISPATCHER.get().cloned().ok_or(LoggerError::Uninitialized)
}

pub fn is_initialized() -> bool {
    DISPATCHER.get().is_some()
}

#[track_caller]
pub fn log(level: Level, message: &str, context: impl Into<Value>) -> LoggerResult<()> {
    let dispatcher = DISPATCHER.get().ok_or(LoggerError::Uninitialized)?;
    dispatcher.log(level, message, context);
    Ok(())
}

#[track_caller]
pub fn debug(message: &str, context: impl Into<Value>) -> LoggerResult<()> {
    log(Level::Debug, message, context)
}

#[track_caller]
pub fn info(message: &str, context: impl Into<Value>) -> LoggerResult<()> {
    log(Level::Info, message, context)
}

#[track_caller]
pub fn notice(message: &str, context: impl Into<Value>) -> LoggerResult<()> {
    log(Level::Notice, message, context)
}

#[track_caller]
pub fn warning(message: &str, context: impl Into<Value>) -> LoggerResult<()> {
    log(Level::Warning, message, context)
}

#[track_caller]
pub fn error(message: &str, context: impl Into<Value>) -> LoggerResult<()> {
    log(Level::Error, message, context)
}

#[track_caller]
pub fn critical(message: &str, context: impl Into<Value>) -> LoggerResult<()> {
    log(Level::Critical, message, context)
}

#[track_caller]
pub fn alert(message: &str, context: impl Into<Value>) -> LoggerResult<()> {
    log(Level::Alert, message, context)
}

#[track_caller]
pub fn emergency(message: &str, context: impl Into<Value>) -> LoggerResult<()> {
    log(Level::Emergency, message, context)
}

/// Grouped record at a level given by name.
#[track_caller]
pub fn trace(
    level: &str,
    message: &str,
    group: &str,
    context: impl Into<Value>,
) -> LoggerResult<()> {
    let dispatcher = DISPATCHER.get().ok_or(LoggerError::Uninitialized)?;
    dispatcher.trace(level, message, group, context)
}

/// Severity chosen by method name at runtime.
///
/// Names outside the eight severities are rejected with `InvalidLevel`.
#[track_caller]
pub fn call(name: &str, message: &str, context: impl Into<Value>) -> LoggerResult<()> {
    let dispatcher = DISPATCHER.get().ok_or(LoggerError::Uninitialized)?;
    dispatcher.call(name, message, context)
}
