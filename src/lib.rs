//! Logging facade for web applications.
//!
//! Wraps a structured logger, routes records to a GELF collector over UDP or
//! to a daily rotating file, enriches every record with request, session and
//! environment context, and can hook into process-wide warnings and panics.
//!
//! ```no_run
//! use dh_logger::{facade, LoggerConfig};
//! use serde_json::json;
//!
//! let config = LoggerConfig { handler: "file".into(), ..LoggerConfig::default() };
//! let logger = facade::initialize("shop", config)?;
//! logger.error("payment failed", json!({ "order": 1234 }));
//! # Ok::<(), dh_logger::LoggerError>(())
//! ```

pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod facade;
pub mod hooks;
pub mod http;
pub mod logger;
pub mod observability;
pub mod sink;

pub use config::LoggerConfig;
pub use context::{AuthenticatedUser, CallSite, RequestContext};
pub use dispatcher::Dispatcher;
pub use error::{LoggerError, LoggerResult};
pub use logger::{Context, Level, LogRecord};
pub use sink::{MemorySink, Sink};
