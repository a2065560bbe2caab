//! # Request Metrics
//!
//! Records request count and latency per matched route through the
//! `metrics` facade. Exported by whichever recorder the binary installs;
//! a no-op when none is installed.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Middleware that records `sumproof_http_requests_total` and
/// `sumproof_http_request_duration_seconds`.
///
/// Installed with `route_layer`, so only matched routes reach it.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let Some(path) = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
    else {
        return next.run(request).await;
    };
    let method = request.method().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        "sumproof_http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(
        "sumproof_http_request_duration_seconds",
        "method" => method,
        "path" => path,
    )
    .record(start.elapsed().as_secs_f64());

    response
}
