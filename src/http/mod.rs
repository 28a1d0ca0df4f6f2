//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! incoming request
//!     → request.rs middleware
//!         capture RequestContext (hosts, agent, cookies, AuthenticatedUser)
//!         issue the session cookie when configured and missing
//!     → handler runs inside RequestContext::scope
//!         every Dispatcher call enriches from the scoped context
//!     → response (+ Set-Cookie when a session id was issued)
//! ```

pub mod request;

pub use request::{new_session_id, request_context_middleware, session_cookie};
