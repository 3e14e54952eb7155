//! HTTP API application wiring (Axum router + middleware pipeline + services).
//!
//! - `services.rs`: the owned course store and other handler dependencies
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request body extraction
//! - `errors.rs`: plain-text error responses

use std::any::Any;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Router,
};
use tower::Layer;
use tower_http::{
    catch_panic::CatchPanicLayer, normalize_path::NormalizePathLayer, services::ServeDir,
};

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> Router {
    let services = Arc::new(services::build_services(config));
    let handlers = routes::router().layer(Extension(services));
    with_pipeline(lenient_trailing_slash(handlers), config)
}

/// Route `/api/courses/` like `/api/courses`.
///
/// The path is rewritten before routing, which `Router::layer` cannot do, so the
/// handlers are wrapped as a service instead.
fn lenient_trailing_slash(handlers: Router) -> Router {
    Router::new().fallback_service(NormalizePathLayer::trim_trailing_slash().layer(handlers))
}

/// Wrap route handlers in the middleware pipeline.
///
/// Layers added later run earlier, so this reads bottom-up: security headers, panic
/// guard, static files, access log, request logger, admin interceptor, handlers.
fn with_pipeline(handlers: Router, config: &AppConfig) -> Router {
    let mut app = handlers
        .layer(axum::middleware::from_fn(middleware::admin_banner))
        .layer(axum::middleware::from_fn(middleware::request_logger));

    if config.access_log_enabled() {
        app = app.layer(axum::middleware::from_fn(middleware::access_log));
    }

    app.layer(axum::middleware::from_fn_with_state(
        ServeDir::new(&config.public_dir),
        middleware::serve_static,
    ))
    .layer(CatchPanicLayer::custom(handle_panic))
    .layer(axum::middleware::from_fn(middleware::security_headers))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
