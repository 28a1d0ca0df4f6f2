//! Context enrichment.
//!
//! # Responsibilities
//! - Normalize whatever the caller passed into a key/value context
//! - Fill in call site, host, user, agent, deployment environment and
//!   correlation id
//!
//! # Design Decisions
//! - Caller keys always win; enrichment only fills gaps
//! - Never fails: unresolvable fields fall back to sentinels or are omitted
//! - Pure function of (context, call site, request, ambient)

use serde_json::Value;

use crate::config::LoggerConfig;
use crate::context::ambient::Ambient;
use crate::context::request::RequestContext;
use crate::context::site::CallSite;
use crate::logger::Context;

/// Agent reported when there is no request.
pub const CLI_AGENT: &str = "cli";

/// Key used to wrap non-map contexts.
pub const PARAM_KEY: &str = "param";

/// Enriches record contexts.
#[derive(Debug, Clone)]
pub struct Enricher {
    session_cookie_name: String,
    environment: Option<String>,
    ambient: Ambient,
}

impl Enricher {
    pub fn new(config: &LoggerConfig, ambient: Ambient) -> Self {
        Self {
            session_cookie_name: config.session_cookie_name.clone(),
            environment: config.environment.clone().filter(|e| !e.is_empty()),
            ambient,
        }
    }

    /// Normalize and enrich in one step.
    pub fn compile(
        &self,
        context: Value,
        site: &CallSite,
        request: Option<&RequestContext>,
    ) -> Context {
        self.enrich(normalize(context), site, request)
    }

    /// Fill the gaps of an already normalized context.
    pub fn enrich(
        &self,
        mut context: Context,
        site: &CallSite,
        request: Option<&RequestContext>,
    ) -> Context {
        let mut fill = |key: &str, value: Value| {
            context.entry(key).or_insert(value);
        };

        fill("file", Value::from(site.file.as_str()));
        fill("line", Value::from(site.line));
        fill("host", Value::from(self.host(request)));
        fill("user", Value::from(request.and_then(|r| r.user).unwrap_or(0)));
        fill(
            "agent",
            Value::from(
                request
                    .and_then(|r| r.user_agent.as_deref())
                    .unwrap_or(CLI_AGENT),
            ),
        );
        if let Some(env) = &self.environment {
            fill("env", Value::from(env.as_str()));
        }
        if let Some(uid) = self.uid(request) {
            fill("uid", Value::from(uid));
        }

        context
    }

    /// Forwarded host, host header, server name, then the machine name.
    fn host<'a>(&'a self, request: Option<&'a RequestContext>) -> &'a str {
        request
            .and_then(|r| {
                [&r.forwarded_host, &r.host, &r.server_name]
                    .into_iter()
                    .flatten()
                    .map(String::as_str)
                    .find(|h| !h.is_empty())
            })
            .unwrap_or_else(|| self.ambient.hostname())
    }

    /// Cookie first, then the process variable; the last non-empty match wins.
    fn uid<'a>(&'a self, request: Option<&'a RequestContext>) -> Option<&'a str> {
        let name = self.session_cookie_name.as_str();
        let from_cookie = request.and_then(|r| r.cookie(name));
        self.ambient.var(name).or(from_cookie)
    }
}

/// Turn any JSON value into a context map.
///
/// Objects pass through, null becomes empty, anything else is wrapped
/// under `param`.
pub fn normalize(context: Value) -> Context {
    match context {
        Value::Object(map) => map,
        Value::Null => Context::new(),
        Value::String(s) => Context::from_iter([(PARAM_KEY.to_string(), Value::String(s))]),
        other => Context::from_iter([(PARAM_KEY.to_string(), Value::String(other.to_string()))]),
    }
}
