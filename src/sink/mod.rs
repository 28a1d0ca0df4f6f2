//! Log sinks and the transport selector.
//!
//! # Data Flow
//! ```text
//! LoggerConfig.handler
//!     → build_sink()
//!         "network" → gelf.rs (GELF 1.1 over UDP, chunked)
//!         "file"    → file.rs (daily rotating <facility>.<date>.log)
//!         other     → LoggerError::UnsupportedHandler
//! ```
//!
//! # Design Decisions
//! - Sinks are chosen once, when the dispatcher is built
//! - Each sink serializes its own writes; the trait is `Send + Sync`
//! - Write errors are returned, the dispatcher decides to drop them

pub mod file;
pub mod gelf;
pub mod memory;

use thiserror::Error;

use crate::config::{HandlerKind, LoggerConfig};
use crate::context::ambient::machine_hostname;
use crate::error::LoggerError;
use crate::logger::LogRecord;

pub use file::FileSink;
pub use gelf::GelfSink;
pub use memory::MemorySink;

/// Errors raised while opening or writing to a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to open rolling log file: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),

    #[error("Collector address {0} did not resolve")]
    Resolve(String),

    #[error("Record needs {chunks} chunks, the limit is {max}")]
    TooManyChunks { chunks: usize, max: usize },
}

/// A destination for log records.
pub trait Sink: Send + Sync {
    /// Write one record.
    fn write(&self, record: &LogRecord) -> Result<(), SinkError>;

    /// Short name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Build the sink selected by the configuration.
pub fn build_sink(facility: &str, config: &LoggerConfig) -> Result<Box<dyn Sink>, LoggerError> {
    let sink: Box<dyn Sink> = match config.handler_kind()? {
        HandlerKind::Network => Box::new(GelfSink::new(&config.gelf, machine_hostname())?),
        HandlerKind::File => Box::new(FileSink::open(facility, &config.file)?),
    };

    tracing::debug!(
        facility = %facility,
        sink = sink.name(),
        "Log sink ready"
    );

    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_handler_is_rejected() {
        let config = LoggerConfig {
            handler: "syslog".into(),
            ..LoggerConfig::default()
        };

        let err = build_sink("svc", &config).err().unwrap();
        assert!(matches!(err, LoggerError::UnsupportedHandler(ref v) if v == "syslog"));
    }

    #[test]
    fn test_file_handler() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = LoggerConfig {
            handler: "file".into(),
            ..LoggerConfig::default()
        };
        config.file.root = Some(dir.path().to_path_buf());

        let sink = build_sink("svc", &config).unwrap();
        assert_eq!(sink.name(), "file");
        assert!(dir.path().join("logs").is_dir());
    }

    #[test]
    fn test_network_handler() {
        let mut config = LoggerConfig::default();
        config.gelf.address = "127.0.0.1:12201".into();

        let sink = build_sink("svc", &config).unwrap();
        assert_eq!(sink.name(), "gelf");
    }
}
