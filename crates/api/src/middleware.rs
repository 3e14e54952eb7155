//! Request pipeline middleware.
//!
//! Order, outermost first (see `app::build_app`): security headers, static files,
//! access log (development only), request logger, admin interceptor.

use std::time::Instant;

use axum::{
    body::{Body, HttpBody},
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeDir;

pub const ADMIN_PREFIX: &str = "/api/admin";
pub const ADMIN_BANNER: &str = "Custom URL middleware <br /><br />URL: /api/admin";

/// Hardening headers set on every response.
const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-dns-prefetch-control", "off"),
    ("x-frame-options", "SAMEORIGIN"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
    ("x-download-options", "noopen"),
    ("x-content-type-options", "nosniff"),
    ("x-xss-protection", "1; mode=block"),
];

pub async fn security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;

    let headers = response.headers_mut();
    headers.remove("x-powered-by");
    for &(name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    response
}

/// Serve a file from the public directory if one matches; otherwise continue.
///
/// Only `GET` and `HEAD` look at the filesystem.
pub async fn serve_static(State(dir): State<ServeDir>, req: Request, next: Next) -> Response {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return next.run(req).await;
    }

    let mut lookup = Request::new(Body::empty());
    *lookup.method_mut() = req.method().clone();
    *lookup.uri_mut() = req.uri().clone();
    *lookup.headers_mut() = req.headers().clone();

    let response = match dir.oneshot(lookup).await {
        Ok(res) => res,
        Err(never) => match never {},
    };

    if response.status() == StatusCode::NOT_FOUND {
        return next.run(req).await;
    }

    tracing::debug!(path = %req.uri().path(), status = response.status().as_u16(), "static file");
    response.map(Body::new)
}

/// Per-request access log line, written once the response is ready.
pub async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    let response = next.run(req).await;

    let length = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| response.body().size_hint().exact().map(|n| n.to_string()))
        .unwrap_or_else(|| "-".to_string());
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    tracing::info!(
        method = %method,
        uri = %uri,
        status = response.status().as_u16(),
        content_length = %length,
        elapsed_ms,
        "{} {} {} {} - {:.3} ms",
        method,
        uri,
        response.status().as_u16(),
        length,
        elapsed_ms,
    );

    response
}

/// Log every request that reaches the handlers' side of the pipeline.
pub async fn request_logger(req: Request, next: Next) -> Response {
    tracing::info!(method = %req.method(), path = %req.uri().path(), "Logging...");
    next.run(req).await
}

/// `/api/admin` and anything below it.
pub fn is_admin_path(path: &str) -> bool {
    path == ADMIN_PREFIX
        || path
            .strip_prefix(ADMIN_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Answer admin paths with the banner and stop; the route handlers never see them.
pub async fn admin_banner(req: Request, next: Next) -> Response {
    if is_admin_path(req.uri().path()) {
        tracing::debug!(method = %req.method(), path = %req.uri().path(), "admin path intercepted");
        return Html(ADMIN_BANNER).into_response();
    }
    next.run(req).await
}
