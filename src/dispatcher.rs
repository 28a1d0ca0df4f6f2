//! The dispatcher: one entry point per severity.
//!
//! # Responsibilities
//! - Own the configured logger, its sink and the enricher
//! - Expose `debug` … `emergency`, a generic `log`, and `trace` with a group
//! - Honor the bypass switch
//! - Absorb sink failures so logging never interrupts the caller
//!
//! # Design Decisions
//! - Cheap to clone (shared `Arc`), passed to whoever needs to log
//! - Call sites are captured with `#[track_caller]`, no stack inspection
//! - The request context comes from the task-local scope unless given
//!   explicitly through `log_with`

use std::sync::Arc;

use serde_json::Value;

use crate::config::validation::validate_config;
use crate::config::LoggerConfig;
use crate::context::{normalize, Ambient, CallSite, Enricher, RequestContext};
use crate::error::LoggerResult;
use crate::hooks;
use crate::logger::{Context, Level, Logger};
use crate::sink::{build_sink, Sink};

struct Inner {
    facility: String,
    config: LoggerConfig,
    logger: Logger,
    enricher: Enricher,
}

/// Configured logging facade for one facility.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

impl Dispatcher {
    /// Validate the configuration, build the selected sink and install the
    /// requested process hooks.
    pub fn new(facility: &str, config: LoggerConfig) -> LoggerResult<Self> {
        validate_config(&config)?;
        let sink = build_sink(facility, &config)?;
        Ok(Self::with_sink(facility, config, sink))
    }

    /// Use a caller-provided sink instead of the configured handler.
    pub fn with_sink(facility: &str, config: LoggerConfig, sink: Box<dyn Sink>) -> Self {
        Self::with_parts(
            facility,
            config,
            Logger::new(facility).with_sink(sink),
            Ambient::from_process(),
        )
    }

    /// Assemble a dispatcher from explicit parts.
    pub fn with_parts(
        facility: &str,
        config: LoggerConfig,
        logger: Logger,
        ambient: Ambient,
    ) -> Self {
        let enricher = Enricher::new(&config, ambient);
        let dispatcher = Self {
            inner: Arc::new(Inner {
                facility: facility.to_string(),
                config,
                logger,
                enricher,
            }),
        };

        tracing::info!(
            facility = %facility,
            sinks = ?dispatcher.inner.logger.sink_names(),
            bypass = dispatcher.inner.config.bypass,
            "Logger initialized"
        );

        hooks::install(&dispatcher);
        dispatcher
    }

    pub fn facility(&self) -> &str {
        &self.inner.facility
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.inner.config
    }

    pub fn is_bypassed(&self) -> bool {
        self.inner.config.bypass
    }

    #[track_caller]
    pub fn debug(&self, message: &str, context: impl Into<Value>) {
        self.log(Level::Debug, message, context)
    }

    #[track_caller]
    pub fn info(&self, message: &str, context: impl Into<Value>) {
        self.log(Level::Info, message, context)
    }

    #[track_caller]
    pub fn notice(&self, message: &str, context: impl Into<Value>) {
        self.log(Level::Notice, message, context)
    }

    #[track_caller]
    pub fn warning(&self, message: &str, context: impl Into<Value>) {
        self.log(Level::Warning, message, context)
    }

    #[track_caller]
    pub fn error(&self, message: &str, context: impl Into<Value>) {
        self.log(Level::Error, message, context)
    }

    #[track_caller]
    pub fn critical(&self, message: &str, context: impl Into<Value>) {
        self.log(Level::Critical, message, context)
    }

    #[track_caller]
    pub fn alert(&self, message: &str, context: impl Into<Value>) {
        self.log(Level::Alert, message, context)
    }

    #[track_caller]
    pub fn emergency(&self, message: &str, context: impl Into<Value>) {
        self.log(Level::Emergency, message, context)
    }

    /// Log at an explicit level.
    #[track_caller]
    pub fn log(&self, level: Level, message: &str, context: impl Into<Value>) {
        if self.is_bypassed() {
            return;
        }
        let site = CallSite::caller();
        let request = RequestContext::current();
        self.write(level, message, normalize(context.into()), &site, request.as_ref());
    }

    /// Log at a level given by name, tagging the record with `group`.
    #[track_caller]
    pub fn trace(
        &self,
        level: &str,
        message: &str,
        group: &str,
        context: impl Into<Value>,
    ) -> LoggerResult<()> {
        let level: Level = level.parse()?;
        if self.is_bypassed() {
            return Ok(());
        }

        let mut context = normalize(context.into());
        context.insert("group".to_string(), Value::from(group));

        let site = CallSite::caller();
        let request = RequestContext::current();
        self.write(level, message, context, &site, request.as_ref());
        Ok(())
    }

    /// Log at a severity given by its method name.
    #[track_caller]
    pub fn call(&self, name: &str, message: &str, context: impl Into<Value>) -> LoggerResult<()> {
        let level: Level = name.parse()?;
        self.log(level, message, context);
        Ok(())
    }

    /// Log with an explicit call site and request context.
    pub fn log_with(
        &self,
        level: Level,
        message: &str,
        context: impl Into<Value>,
        site: &CallSite,
        request: Option<&RequestContext>,
    ) {
        if self.is_bypassed() {
            return;
        }
        self.write(level, message, normalize(context.into()), site, request);
    }

    /// The context a record would carry, without writing it.
    pub fn compile(
        &self,
        context: impl Into<Value>,
        site: &CallSite,
        request: Option<&RequestContext>,
    ) -> Context {
        self.inner.enricher.compile(context.into(), site, request)
    }

    fn write(
        &self,
        level: Level,
        message: &str,
        context: Context,
        site: &CallSite,
        request: Option<&RequestContext>,
    ) {
        let context = self.inner.enricher.enrich(context, site, request);
        if let Err(e) = self.inner.logger.log(level, message, context) {
            tracing::debug!(
                facility = %self.inner.facility,
                level = %level,
                error = %e,
                "Dropped log record"
            );
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("facility", &self.inner.facility)
            .field("logger", &self.inner.logger)
            .field("bypass", &self.inner.config.bypass)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoggerError;
    use crate::sink::memory::{FailingSink, MemorySink};
    use serde_json::json;
    use std::collections::HashMap;

    fn quiet_config() -> LoggerConfig {
        LoggerConfig {
            install_error_handler: false,
            install_exception_handler: false,
            install_fatal_handler: false,
            ..LoggerConfig::default()
        }
    }

    fn dispatcher(config: LoggerConfig) -> (Dispatcher, MemorySink) {
        let sink = MemorySink::new();
        let logger = Logger::new("svc").with_sink(Box::new(sink.clone()));
        let ambient = Ambient::new("web-1", HashMap::new());
        (Dispatcher::with_parts("svc", config, logger, ambient), sink)
    }

    #[test]
    fn test_each_severity_is_forwarded() {
        let (logger, sink) = dispatcher(quiet_config());

        logger.debug("m", Value::Null);
        logger.info("m", Value::Null);
        logger.notice("m", Value::Null);
        logger.warning("m", Value::Null);
        logger.error("m", Value::Null);
        logger.critical("m", Value::Null);
        logger.alert("m", Value::Null);
        logger.emergency("m", Value::Null);

        let levels: Vec<Level> = sink.records().iter().map(|r| r.level).collect();
        assert_eq!(levels, Level::ALL.to_vec());
    }

    #[test]
    fn test_call_site_is_the_caller() {
        let (logger, sink) = dispatcher(quiet_config());

        let expected_line = line!() + 1;
        logger.error("boom", json!({"x": 1}));

        let record = sink.last().unwrap();
        assert_eq!(record.message, "boom");
        assert_eq!(record.context["x"], 1);
        assert_eq!(record.context["line"], expected_line);
        assert!(record.context["file"].as_str().unwrap().ends_with("dispatcher.rs"));
        assert_eq!(record.context["host"], "web-1");
        assert_eq!(record.context["agent"], "cli");
        assert_eq!(record.context["user"], 0);
    }

    #[test]
    fn test_bypass_writes_nothing() {
        let config = LoggerConfig {
            bypass: true,
            ..quiet_config()
        };
        let (logger, sink) = dispatcher(config);

        for level in Level::ALL {
            logger.log(level, "ignored", json!({"k": "v"}));
            logger.trace(level.as_str(), "ignored", "grp", Value::Null).unwrap();
        }
        logger.log_with(Level::Error, "ignored", Value::Null, &CallSite::unknown(), None);

        assert!(sink.is_empty());
    }

    #[test]
    fn test_trace_injects_group() {
        let (logger, sink) = dispatcher(quiet_config());

        logger.trace("error", "msg", "grp", json!({})).unwrap();

        let record = sink.last().unwrap();
        assert_eq!(record.level, Level::Error);
        assert_eq!(record.context["group"], "grp");
    }

    #[test]
    fn test_trace_rejects_unknown_level() {
        let (logger, sink) = dispatcher(quiet_config());

        let err = logger.trace("not-a-level", "msg", "grp", Value::Null).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidLevel(ref v) if v == "not-a-level"));

        let bypassed = dispatcher(LoggerConfig { bypass: true, ..quiet_config() }).0;
        assert!(bypassed.trace("loud", "msg", "grp", Value::Null).is_err());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_call_by_name() {
        let (logger, sink) = dispatcher(quiet_config());

        logger.call("notice", "by name", Value::Null).unwrap();
        assert_eq!(sink.last().unwrap().level, Level::Notice);

        assert!(logger.call("shout", "by name", Value::Null).is_err());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_sink_failure_is_swallowed() {
        let logger = Dispatcher::with_sink("svc", quiet_config(), Box::new(FailingSink));
        logger.error("still fine", Value::Null);
        assert!(logger.trace("info", "still fine", "grp", Value::Null).is_ok());
    }

    #[test]
    fn test_scoped_request_context() {
        let (logger, sink) = dispatcher(quiet_config());
        let request = RequestContext {
            host: Some("shop.example".into()),
            user_agent: Some("Mozilla/5.0".into()),
            ..RequestContext::default()
        }
        .with_cookie("dh-uid", "abc");

        request.sync_scope(|| logger.info("in request", Value::Null));

        let record = sink.last().unwrap();
        assert_eq!(record.context["host"], "shop.example");
        assert_eq!(record.context["agent"], "Mozilla/5.0");
        assert_eq!(record.context["uid"], "abc");
    }

    #[test]
    fn test_unsupported_handler_fails_construction() {
        let config = LoggerConfig {
            handler: "syslog".into(),
            ..quiet_config()
        };
        let err = Dispatcher::new("svc", config).unwrap_err();
        assert!(matches!(err, LoggerError::UnsupportedHandler(_)));
    }

    #[test]
    fn test_invalid_config_fails_construction() {
        let config = LoggerConfig {
            session_cookie_name: String::new(),
            ..quiet_config()
        };
        let err = Dispatcher::new("svc", config).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfig(_)));
    }
}
