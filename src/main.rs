//! Demo web service wired with the logging facade.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ TraceLayer ──▶ request_context_middleware ──▶ handler
//!                                    (RequestContext, dh-uid cookie)   │
//!                                                                      ▼
//!                                                                 Dispatcher
//!                                                                      │
//!                                                  enrich ─────────────┤
//!                                                                      ▼
//!                                                     GELF/UDP collector or
//!                                                     logs/<facility>.<date>.log
//! ```
//!
//! Environment:
//! - `DH_LOGGER_CONFIG`: TOML configuration file (defaults otherwise)
//! - `DH_LOGGER_FACILITY`: facility name (default `dh-logger-demo`)
//! - `DH_LOGGER_BIND`: listen address (default `0.0.0.0:8080`)

use std::path::Path;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::get,
    Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use dh_logger::config::load_config;
use dh_logger::http::request_context_middleware;
use dh_logger::observability::logging::init_logging;
use dh_logger::{facade, Dispatcher, LoggerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::var_os("DH_LOGGER_CONFIG") {
        Some(path) => load_config(Path::new(&path))?,
        None => LoggerConfig::default(),
    };

    // With the error handler enabled the hook installer sets up the
    // subscriber, bridge included.
    if !config.install_error_handler {
        init_logging(&config.observability.log_level);
    }

    let facility =
        std::env::var("DH_LOGGER_FACILITY").unwrap_or_else(|_| "dh-logger-demo".to_string());
    let logger = facade::initialize(&facility, config)?;

    tracing::info!(
        facility = %logger.facility(),
        handler = %logger.config().handler,
        "Configuration loaded"
    );

    let app = Router::new()
        .route("/", get(index))
        .route("/fail", get(fail))
        .with_state(logger.clone())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(logger, request_context_middleware)),
        );

    let bind = std::env::var("DH_LOGGER_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = TcpListener::bind(&bind).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn index(State(logger): State<Dispatcher>) -> &'static str {
    logger.info("Index served", json!({ "path": "/" }));
    "ok"
}

async fn fail(State(logger): State<Dispatcher>) -> StatusCode {
    logger.error("Demo failure", json!({ "reason": "requested" }));
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
