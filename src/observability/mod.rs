//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! dh_logger internals (sink setup, dropped records, hook installation)
//!     → tracing macros with structured fields
//!     → logging.rs subscriber (EnvFilter + fmt to stderr)
//!
//! Other crates' WARN/ERROR events
//!     → hooks::bridge::DispatchLayer (when the error handler is enabled)
//!     → the dispatcher's sink
//! ```
//!
//! # Design Decisions
//! - The crate's own diagnostics never go through the dispatcher
//! - RUST_LOG overrides the configured level

pub mod logging;
