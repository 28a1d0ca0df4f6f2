//! Log record handed to sinks.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::logger::Level;

/// Structured metadata attached to a record.
pub type Context = Map<String, Value>;

/// A single log record. Built per call, written, then dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Severity.
    pub level: Level,
    /// Facility the record belongs to.
    pub channel: String,
    /// The log message.
    pub message: String,
    /// Enriched context.
    pub context: Context,
    /// When the record was created.
    pub datetime: DateTime<Utc>,
}

impl LogRecord {
    pub fn new(level: Level, channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            channel: channel.into(),
            message: message.into(),
            context: Context::new(),
            datetime: Utc::now(),
        }
    }

    /// Builder-style method for setting context
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Builder-style method for setting the timestamp
    pub fn with_datetime(mut self, datetime: DateTime<Utc>) -> Self {
        self.datetime = datetime;
        self
    }
}
