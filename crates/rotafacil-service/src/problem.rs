//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Provides structured error responses following the Problem Details standard.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use rotafacil_lib::Error as LibError;

/// Problem type URI for invalid request parameters.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for unknown waypoint ids.
pub const PROBLEM_WAYPOINT_NOT_FOUND: &str = "/problems/waypoint-not-found";

/// Problem type URI for link text without recognizable coordinates.
pub const PROBLEM_COORDINATES_NOT_FOUND: &str = "/problems/coordinates-not-found";

/// Problem type URI for route requests that clash with another computation
/// or with concurrent edits.
pub const PROBLEM_ROUTE_CONFLICT: &str = "/problems/route-conflict";

/// Problem type URI for the "no route computed yet" case.
pub const PROBLEM_ROUTE_NOT_FOUND: &str = "/problems/route-not-found";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// Problem type URI for an unreachable routing backend.
pub const PROBLEM_SERVICE_UNAVAILABLE: &str = "/problems/service-unavailable";

/// RFC 9457 Problem Details response structure.
///
/// # Example
///
/// ```
/// use rotafacil_service::{ProblemDetails, PROBLEM_WAYPOINT_NOT_FOUND};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(
///     PROBLEM_WAYPOINT_NOT_FOUND,
///     "Waypoint Not Found",
///     StatusCode::NOT_FOUND,
/// )
/// .with_detail("no waypoint with id 7")
/// .with_request_id("req-12345");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI reference identifying the specific occurrence (e.g., request ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Content type for this response (always "application/problem+json").
    pub content_type: String,
}

impl ProblemDetails {
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            content_type: "application/problem+json".to_string(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// 400 Bad Request for invalid input.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// 404 Not Found for an id that is not registered.
    pub fn waypoint_not_found(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_WAYPOINT_NOT_FOUND,
            "Waypoint Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// 404 Not Found when no route has been computed for the current waypoints.
    pub fn route_not_found(request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_ROUTE_NOT_FOUND,
            "Route Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail("no route has been computed for the current waypoints")
        .with_request_id(request_id)
    }

    /// 422 Unprocessable Content for link text without coordinates.
    pub fn coordinates_not_found(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_COORDINATES_NOT_FOUND,
            "Coordinates Not Found",
            StatusCode::UNPROCESSABLE_ENTITY,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// 409 Conflict for overlapping or outdated route computations.
    pub fn route_conflict(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(PROBLEM_ROUTE_CONFLICT, "Route Conflict", StatusCode::CONFLICT)
            .with_detail(detail)
            .with_request_id(request_id)
    }

    /// 500 Internal Server Error.
    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// 503 Service Unavailable.
    pub fn service_unavailable(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_SERVICE_UNAVAILABLE,
            "Service Unavailable",
            StatusCode::SERVICE_UNAVAILABLE,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.title,
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        *response.status_mut() = status;
        response
    }
}

/// Convert library errors to ProblemDetails.
///
/// The `request_id` must be provided separately since library errors don't have it.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    let detail = error.to_string();
    match error {
        LibError::InvalidCoordinates { .. }
        | LibError::UnparseableCoordinate { .. }
        | LibError::NoWaypoints => ProblemDetails::bad_request(detail, request_id),
        LibError::WaypointNotFound { .. } => ProblemDetails::waypoint_not_found(detail, request_id),
        LibError::CoordinatesNotFound { .. } => {
            ProblemDetails::coordinates_not_found(detail, request_id)
        }
        LibError::RouteInProgress | LibError::StaleRoute => {
            ProblemDetails::route_conflict(detail, request_id)
        }
        LibError::RoutingUnavailable { .. } => {
            ProblemDetails::service_unavailable(detail, request_id)
        }
        _ => ProblemDetails::internal_error(detail, request_id),
    }
}

/// Short label for a failed route computation, used as a metrics label.
pub fn failure_reason(error: &LibError) -> &'static str {
    match error {
        LibError::NoWaypoints => "no_waypoints",
        LibError::RouteInProgress => "in_progress",
        LibError::StaleRoute => "stale",
        LibError::RoutingUnavailable { .. } => "routing_unavailable",
        _ => "internal_error",
    }
}
