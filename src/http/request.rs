//! Request context capture and session cookie bootstrap.
//!
//! # Responsibilities
//! - Build a `RequestContext` for every request
//! - Issue a correlation cookie to clients that have none (when enabled)
//! - Run the rest of the stack with the context bound to the task
//!
//! # Design Decisions
//! - The issued id is visible to records of the same request, not only to
//!   later requests carrying the cookie
//! - Session cookie has no expiry and a root path; it is not authentication

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::dispatcher::Dispatcher;

/// Fresh opaque session id (32 hex characters).
pub fn new_session_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// `Set-Cookie` value for a session id.
pub fn session_cookie(name: &str, id: &str) -> String {
    format!("{name}={id}; Path=/")
}

/// Middleware binding the request context for the downstream handlers.
pub async fn request_context_middleware(
    State(logger): State<Dispatcher>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let mut context = RequestContext::from_parts(&parts);

    let config = logger.config();
    let cookie_name = config.session_cookie_name.as_str();
    let issued = if config.create_session_cookie && context.cookie(cookie_name).is_none() {
        let id = new_session_id();
        context = context.with_cookie(cookie_name, id.clone());
        Some(id)
    } else {
        None
    };

    parts.extensions.insert(context.clone());
    let request = Request::from_parts(parts, body);

    let mut response = context.scope(next.run(request)).await;

    if let Some(id) = issued {
        match HeaderValue::from_str(&session_cookie(cookie_name, &id)) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => {
                tracing::warn!(cookie = %cookie_name, error = %e, "Session cookie not issued");
            }
        }
    }

    response
}
