//! # sumproof-api — Axum API Service
//!
//! Thin HTTP adapter over the proof service in `sumproof-zkp`.
//!
//! ## API Surface
//!
//! | Route                      | Module              | Purpose                   |
//! |----------------------------|---------------------|---------------------------|
//! | `POST /api/proof/generate` | [`routes::proof`]   | Prove `a + b == sum`      |
//! | `POST /api/proof/verify`   | [`routes::proof`]   | Check a proof for `sum`   |
//! | `GET /health`              | [`routes::health`]  | Static health payload     |
//! | `GET /health/liveness`     | [`routes::health`]  | Liveness probe            |
//! | `GET /health/readiness`    | [`routes::health`]  | Key setup state           |
//! | `GET /openapi.json`        | [`openapi`]         | OpenAPI document          |
//! | `GET /metrics`             | this module         | Prometheus exposition     |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CorsLayer → TraceLayer → body limit → MetricsMiddleware → Handler
//! ```
//!
//! ## Crate Policy
//!
//! - No proof logic in route handlers; they delegate to `ProofOperations`
//!   on the blocking pool.
//! - All errors map to structured HTTP responses via `AppError`.

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::{AppConfig, AppState, BackendKind};

/// Request bodies above this size are rejected before JSON parsing.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::proof::router())
        .merge(routes::health::router())
        .merge(openapi::router())
        .route("/metrics", get(metrics))
        .route_layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}

/// Any origin; GET, POST, OPTIONS; Content-Type and Authorization headers.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Prometheus text exposition; 404 when no exporter is installed.
async fn metrics(State(state): State<AppState>) -> Response {
    match &state.prometheus {
        Some(handle) => (
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
