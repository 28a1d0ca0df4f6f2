//! The structured logger wrapped by the dispatcher.
//!
//! # Responsibilities
//! - Turn (level, message, context) into a `LogRecord`
//! - Hand the record to every configured sink
//!
//! # Design Decisions
//! - No filtering here: every record reaches the sinks
//! - A failing sink does not stop the remaining sinks; the first error is
//!   reported back to the caller, who decides whether to surface it

pub mod level;
pub mod record;

pub use level::Level;
pub use record::{Context, LogRecord};

use crate::sink::{Sink, SinkError};

/// A named channel writing records to a stack of sinks.
pub struct Logger {
    channel: String,
    sinks: Vec<Box<dyn Sink>>,
}

impl Logger {
    /// Create a logger for a channel with no sinks.
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            sinks: Vec::new(),
        }
    }

    /// Add a sink to the stack.
    pub fn push_sink(&mut self, sink: Box<dyn Sink>) {
        self.sinks.push(sink);
    }

    /// Builder-style variant of `push_sink`.
    pub fn with_sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.push_sink(sink);
        self
    }

    /// Names of the configured sinks, in write order.
    pub fn sink_names(&self) -> Vec<&'static str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Build a record and write it to every sink.
    pub fn log(&self, level: Level, message: &str, context: Context) -> Result<(), SinkError> {
        let record = LogRecord::new(level, self.channel.as_str(), message).with_context(context);

        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.write(&record) {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("channel", &self.channel)
            .field("sinks", &self.sink_names())
            .finish()
    }
}
