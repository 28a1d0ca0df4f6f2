//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the logger.
//! All types derive Serde traits so partial config files merge onto defaults.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LoggerError;

/// Default GELF collector address.
pub const DEFAULT_COLLECTOR: &str = "91.218.23.60:12201";

/// Datagram payload size for collectors on the local network.
pub const CHUNK_SIZE_LAN: usize = 8154;

/// Root configuration for the logging facade.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Sink selection: "network" (alias "gelf") or "file".
    pub handler: String,

    /// Forward warning/error events of the process to the dispatcher.
    pub install_error_handler: bool,

    /// Log uncaught panics.
    pub install_exception_handler: bool,

    /// Log panics that terminate the process.
    pub install_fatal_handler: bool,

    /// Turn every log call into a no-op.
    pub bypass: bool,

    /// Issue a session cookie to requests that lack one.
    pub create_session_cookie: bool,

    /// Cookie (and ambient variable) carrying the correlation id.
    pub session_cookie_name: String,

    /// Deployment environment name, attached as `env` when set.
    pub environment: Option<String>,

    /// Network sink settings.
    pub gelf: GelfConfig,

    /// File sink settings.
    pub file: FileConfig,

    /// The crate's own diagnostics.
    pub observability: ObservabilityConfig,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            handler: HandlerKind::Network.as_str().to_string(),
            install_error_handler: true,
            install_exception_handler: false,
            install_fatal_handler: true,
            bypass: false,
            create_session_cookie: false,
            session_cookie_name: "dh-uid".to_string(),
            environment: None,
            gelf: GelfConfig::default(),
            file: FileConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl LoggerConfig {
    /// Parse the configured handler kind.
    pub fn handler_kind(&self) -> Result<HandlerKind, LoggerError> {
        self.handler.parse()
    }

    /// Whether any process hook is requested.
    pub fn wants_hooks(&self) -> bool {
        self.install_error_handler || self.install_exception_handler || self.install_fatal_handler
    }
}

/// Supported sink kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// GELF datagrams to a remote collector.
    Network,
    /// Daily rotating local file.
    File,
}

impl HandlerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerKind::Network => "network",
            HandlerKind::File => "file",
        }
    }
}

impl FromStr for HandlerKind {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "network" | "gelf" => Ok(HandlerKind::Network),
            "file" => Ok(HandlerKind::File),
            _ => Err(LoggerError::UnsupportedHandler(s.to_string())),
        }
    }
}

/// GELF collector configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GelfConfig {
    /// Collector address (e.g., "graylog.internal:12201").
    pub address: String,

    /// Maximum payload bytes per datagram before chunking.
    pub chunk_size: usize,

    /// Zlib-compress the JSON payload.
    pub compress: bool,
}

impl Default for GelfConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_COLLECTOR.to_string(),
            chunk_size: CHUNK_SIZE_LAN,
            compress: true,
        }
    }
}

/// Rotating file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FileConfig {
    /// Application root. Falls back to the working directory.
    pub root: Option<PathBuf>,

    /// Logs directory, relative to the root.
    pub directory: PathBuf,

    /// Number of dated files to keep (unlimited when unset).
    pub max_files: Option<usize>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            root: None,
            directory: PathBuf::from("logs"),
            max_files: None,
        }
    }
}

impl FileConfig {
    /// Resolve the logs directory against the application root.
    pub fn logs_dir(&self) -> PathBuf {
        let root = self
            .root
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        root.join(&self.directory)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level for the crate's own diagnostics (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
