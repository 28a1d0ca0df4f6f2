//! Structured logging for the crate's own diagnostics.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber
//! - Optionally stack the dispatcher bridge next to console output
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log level configurable via config and environment
//! - Never replaces a subscriber the host already installed

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::hooks::DispatchLayer;

/// Install a console subscriber. Returns `false` if one was already set.
pub fn init_logging(level: &str) -> bool {
    install(level, None)
}

/// Install a console subscriber plus the dispatcher bridge.
pub fn init_logging_with(level: &str, bridge: DispatchLayer) -> bool {
    install(level, Some(bridge))
}

/// `RUST_LOG` when set, the given level otherwise.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn install(level: &str, bridge: Option<DispatchLayer>) -> bool {
    tracing_subscriber::registry()
        .with(bridge)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(env_filter(level)),
        )
        .try_init()
        .is_ok()
}
