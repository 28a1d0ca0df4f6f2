//! Request-scoped context.
//!
//! # Responsibilities
//! - Capture the request facts enrichment needs (hosts, agent, user, cookies)
//! - Bind them to the task handling the request
//!
//! # Design Decisions
//! - Plain value, built once per request and passed or scoped explicitly
//! - Task-local scope: work spawned onto other tasks does not inherit it

use std::collections::HashMap;
use std::future::Future;

use axum::http::{header, request::Parts, HeaderMap, Uri};

tokio::task_local! {
    static CURRENT: RequestContext;
}

/// Header carrying the original host behind a reverse proxy.
pub const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// Authenticated user, attached to requests by the host's auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub u64);

/// What enrichment knows about the request being served.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub forwarded_host: Option<String>,
    pub host: Option<String>,
    pub server_name: Option<String>,
    pub user_agent: Option<String>,
    pub user: Option<u64>,
    pub cookies: HashMap<String, String>,
}

impl RequestContext {
    /// Capture headers, URI and the authenticated user of a request.
    pub fn from_parts(parts: &Parts) -> Self {
        let mut context = Self::from_headers(&parts.headers, &parts.uri);
        context.user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .map(|user| user.0);
        context
    }

    pub fn from_headers(headers: &HeaderMap, uri: &Uri) -> Self {
        let forwarded_host = header_str(headers, X_FORWARDED_HOST)
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Self {
            forwarded_host,
            host: header_str(headers, header::HOST.as_str()).map(str::to_string),
            server_name: uri.host().map(str::to_string),
            user_agent: header_str(headers, header::USER_AGENT.as_str()).map(str::to_string),
            user: None,
            cookies: parse_cookies(headers),
        }
    }

    pub fn with_user(mut self, user: u64) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Non-empty cookie value.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Run a future with this context bound to the current task.
    pub async fn scope<F: Future>(self, f: F) -> F::Output {
        CURRENT.scope(self, f).await
    }

    /// Run a closure with this context bound.
    pub fn sync_scope<R>(self, f: impl FnOnce() -> R) -> R {
        CURRENT.sync_scope(self, f)
    }

    /// The context bound to the current task, if any.
    pub fn current() -> Option<Self> {
        CURRENT.try_with(Clone::clone).ok()
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// Parse every `Cookie` header. The first occurrence of a name wins.
pub fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for value in headers.get_all(header::COOKIE) {
        let Ok(value) = value.to_str() else { continue };
        for pair in value.split(';') {
            if let Some((name, val)) = pair.trim().split_once('=') {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                cookies
                    .entry(name.to_string())
                    .or_insert_with(|| val.trim().trim_matches('"').to_string());
            }
        }
    }
    cookies
}
