//! In-memory sinks for tests and embedding applications.

use std::sync::{Arc, Mutex, PoisonError};

use crate::logger::LogRecord;
use crate::sink::{Sink, SinkError};

/// Captures every record it receives. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the captured records.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent record, if any.
    pub fn last(&self) -> Option<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Sink for MemorySink {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// A sink whose writes always fail, for exercising error paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSink;

impl Sink for FailingSink {
    fn write(&self, _record: &LogRecord) -> Result<(), SinkError> {
        Err(SinkError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "sink unavailable",
        )))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
