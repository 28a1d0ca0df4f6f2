//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or caller overrides
//!     → loader.rs (parse & deserialize onto defaults)
//!     → validation.rs (semantic checks)
//!     → LoggerConfig (validated, immutable)
//!     → owned by the Dispatcher for the process lifetime
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the dispatcher is built
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{FileConfig, GelfConfig, HandlerKind, LoggerConfig, ObservabilityConfig};
