//! Context enrichment subsystem.
//!
//! # Data Flow
//! ```text
//! caller context (any JSON value)
//!     → enricher.rs normalize() (map, or {"param": ...})
//!     → enricher.rs enrich()
//!         site.rs      file, line        (#[track_caller] at the call)
//!         request.rs   host, user, agent, uid cookie (task-local scope)
//!         ambient.rs   machine hostname, process variables
//!     → Context handed to the logger
//! ```

pub mod ambient;
pub mod enricher;
pub mod request;
pub mod site;

pub use ambient::Ambient;
pub use enricher::{normalize, Enricher};
pub use request::{AuthenticatedUser, RequestContext};
pub use site::CallSite;
