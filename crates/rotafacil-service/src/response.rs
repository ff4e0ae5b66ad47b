//! Response wrapper and payloads for successful HTTP responses.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use rotafacil_lib::{BasePoint, RouteResult, RouteSummary, Waypoint, WaypointId};

/// Wrapper for successful responses with content type metadata, mirroring
/// the `content_type` field of `ProblemDetails`.
///
/// # Example
///
/// ```
/// use rotafacil_service::ServiceResponse;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Cleared {
///     removed: usize,
/// }
///
/// let response = ServiceResponse::new(Cleared { removed: 3 });
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    /// The payload, flattened into the top-level object.
    #[serde(flatten)]
    pub data: T,

    pub content_type: String,
}

impl<T> ServiceResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            content_type: "application/json".to_string(),
        }
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Registry view: the base plus waypoints in display order.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryView {
    pub base: BasePoint,
    pub waypoints: Vec<Waypoint>,
    pub next_id: WaypointId,
}

/// Outcome of a route computation.
#[derive(Debug, Clone, Serialize)]
pub struct RouteView {
    pub route: RouteResult,
    pub summary: RouteSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directions_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClearedView {
    pub removed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_flattens_payload() {
        let response = ServiceResponse::new(ClearedView { removed: 2 });
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"removed\":2"));
        assert!(json.contains("\"content_type\":\"application/json\""));
        assert!(!json.contains("\"data\":{"));
    }

    #[test]
    fn test_registry_view_serialization() {
        let view = RegistryView {
            base: BasePoint::default(),
            waypoints: Vec::new(),
            next_id: WaypointId(1),
        };
        let json = serde_json::to_value(ServiceResponse::new(view)).unwrap();
        assert_eq!(json["base"]["name"], "Central (Base)");
        assert_eq!(json["next_id"], 1);
        assert!(json["waypoints"].as_array().unwrap().is_empty());
    }
}
