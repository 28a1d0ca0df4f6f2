//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::path::Path;

use dh_logger::context::Ambient;
use dh_logger::logger::Logger;
use dh_logger::{Dispatcher, LoggerConfig, MemorySink};

/// Default configuration with every process hook disabled.
pub fn quiet_config() -> LoggerConfig {
    LoggerConfig {
        install_error_handler: false,
        install_exception_handler: false,
        install_fatal_handler: false,
        ..LoggerConfig::default()
    }
}

/// File-mode configuration rooted in a temporary directory.
#[allow(dead_code)]
pub fn file_config(root: &Path) -> LoggerConfig {
    let mut config = quiet_config();
    config.handler = "file".into();
    config.file.root = Some(root.to_path_buf());
    config
}

/// Dispatcher writing to a memory sink, on a fixed machine name.
#[allow(dead_code)]
pub fn memory_dispatcher(config: LoggerConfig) -> (Dispatcher, MemorySink) {
    let sink = MemorySink::new();
    let logger = Logger::new("svc").with_sink(Box::new(sink.clone()));
    let ambient = Ambient::new("test-host", HashMap::new());
    (Dispatcher::with_parts("svc", config, logger, ambient), sink)
}
