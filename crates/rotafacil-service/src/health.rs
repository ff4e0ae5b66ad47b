//! Health check handlers for liveness and readiness probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "ok", or "busy" while a route computation is pending.
    pub status: String,

    pub service: String,

    pub version: String,

    /// Number of registered waypoints (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waypoints: Option<usize>,

    /// Whether a route is available for the current waypoints (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_ready: Option<bool>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            waypoints: None,
            route_ready: None,
        }
    }

    pub fn ready(service: &str, version: &str, waypoints: usize, route_ready: bool) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            waypoints: Some(waypoints),
            route_ready: Some(route_ready),
        }
    }
}

/// Liveness probe handler.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"rotafacil-service","version":"0.1.0"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler. Reports the session size; the session is always
/// usable, so this never fails.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let (waypoints, route_ready, busy) = {
        let session = state.session();
        (
            session.waypoints().len(),
            session.current_route().is_some(),
            session.is_routing(),
        )
    };

    let mut status = HealthStatus::ready(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        waypoints,
        route_ready,
    );
    if busy {
        status.status = "busy".to_string();
    }
    (StatusCode::OK, Json(status)).into_response()
}
