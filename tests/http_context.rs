//! Request context middleware: enrichment from headers and session cookies.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware,
    routing::get,
    Extension, Router,
};
use dh_logger::http::request_context_middleware;
use dh_logger::{AuthenticatedUser, Dispatcher, LoggerConfig, RequestContext};
use serde_json::json;
use tower::ServiceExt;

mod common;

async fn handler(State(logger): State<Dispatcher>) -> StatusCode {
    logger.warning("Checkout slow", json!({ "ms": 950 }));
    StatusCode::OK
}

async fn echo_context(Extension(context): Extension<RequestContext>) -> String {
    context.host.unwrap_or_default()
}

fn app(logger: Dispatcher) -> Router {
    Router::new()
        .route("/", get(handler))
        .route("/context", get(echo_context))
        .with_state(logger.clone())
        .layer(middleware::from_fn_with_state(logger, request_context_middleware))
}

fn cookie_config() -> LoggerConfig {
    LoggerConfig {
        create_session_cookie: true,
        ..common::quiet_config()
    }
}

#[tokio::test]
async fn test_records_carry_request_context() {
    let (logger, sink) = common::memory_dispatcher(common::quiet_config());

    let mut request = Request::builder()
        .uri("/")
        .header("x-forwarded-host", "shop.example")
        .header(header::HOST, "origin.internal")
        .header(header::USER_AGENT, "Mozilla/5.0")
        .header(header::COOKIE, "dh-uid=returning-visitor")
        .body(Body::empty())
        .unwrap();
    request.extensions_mut().insert(AuthenticatedUser(42));

    let response = app(logger).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let record = sink.last().unwrap();
    assert_eq!(record.message, "Checkout slow");
    assert_eq!(record.context["ms"], 950);
    assert_eq!(record.context["host"], "shop.example");
    assert_eq!(record.context["agent"], "Mozilla/5.0");
    assert_eq!(record.context["user"], 42);
    assert_eq!(record.context["uid"], "returning-visitor");
}

#[tokio::test]
async fn test_session_cookie_is_issued_once() {
    let (logger, sink) = common::memory_dispatcher(cookie_config());
    let app = app(logger);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("dh-uid="));
    assert!(set_cookie.ends_with("; Path=/"));
    let issued = set_cookie
        .trim_start_matches("dh-uid=")
        .trim_end_matches("; Path=/")
        .to_string();

    let record = sink.last().unwrap();
    assert_eq!(record.context["uid"], issued.as_str());
    assert_eq!(record.context["agent"], "cli");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::COOKIE, format!("dh-uid={issued}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(sink.len(), 2);
    assert_eq!(sink.last().unwrap().context["uid"], issued.as_str());
}

#[tokio::test]
async fn test_no_cookie_without_opt_in() {
    let (logger, sink) = common::memory_dispatcher(common::quiet_config());

    let response = app(logger)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let record = sink.last().unwrap();
    assert!(!record.context.contains_key("uid"));
    assert_eq!(record.context["host"], "test-host");
}

#[tokio::test]
async fn test_context_is_available_as_extension() {
    let (logger, _sink) = common::memory_dispatcher(common::quiet_config());

    let response = app(logger)
        .oneshot(
            Request::builder()
                .uri("/context")
                .header(header::HOST, "origin.internal")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"origin.internal");
}

#[tokio::test]
async fn test_bypass_still_serves_requests() {
    let config = LoggerConfig {
        bypass: true,
        ..cookie_config()
    };
    let (logger, sink) = common::memory_dispatcher(config);

    let response = app(logger)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(sink.is_empty());
}
