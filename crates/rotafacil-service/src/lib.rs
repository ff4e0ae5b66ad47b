//! HTTP service for RotaFácil.
//!
//! Exposes one shared planning session over a small JSON API:
//!
//! - [`AppState`]: the session behind a mutex plus the route orchestrator
//! - [`health`]: liveness/readiness probes
//! - [`ProblemDetails`]: RFC 9457 error bodies
//! - [`ServiceResponse`]: wrapper for successful responses
//! - [`metrics`]: Prometheus metrics
//! - [`logging`]: structured JSON logging setup
//! - [`middleware`]: request ids and request metrics
//!
//! # Architecture
//!
//! Handlers are thin; all behavior lives in `rotafacil-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse and validate request JSON                          │
//! │  - Lock the session, apply one event                        │
//! │  - Map library errors to problem details                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The `test_utils` module provides a scripted routing backend and
//! in-memory state. Enable the `test-utils` feature to use it from other
//! crates.

#![deny(warnings)]

pub mod handlers;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(feature = "test-utils")]
pub mod test_utils;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LoggingConfig};
pub use self::metrics::{
    init_metrics, metrics_handler, record_route_computed, record_route_failed, record_route_stops,
    record_waypoint_event, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, track_requests, RequestId};
pub use problem::{
    failure_reason, from_lib_error, ProblemDetails, PROBLEM_COORDINATES_NOT_FOUND,
    PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST, PROBLEM_ROUTE_CONFLICT,
    PROBLEM_ROUTE_NOT_FOUND, PROBLEM_SERVICE_UNAVAILABLE, PROBLEM_WAYPOINT_NOT_FOUND,
};
pub use request::{AddWaypointRequest, ExtractRequest, UpdateBaseRequest, Validate, WaypointInput};
pub use response::{ClearedView, RegistryView, RouteView, ServiceResponse};
pub use state::{AppState, AppStateError};

/// Build the full router over `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v1/waypoints",
            get(handlers::list_waypoints)
                .post(handlers::add_waypoint)
                .delete(handlers::clear_waypoints),
        )
        .route("/api/v1/waypoints/{id}", delete(handlers::remove_waypoint))
        .route("/api/v1/base", put(handlers::update_base))
        .route("/api/v1/extract", post(handlers::extract_coordinates))
        .route(
            "/api/v1/route",
            get(handlers::current_route).post(handlers::compute_route),
        )
        .route("/metrics", get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .route_layer(axum::middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
