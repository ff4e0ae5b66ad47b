use std::path::PathBuf;

use thiserror::Error;

use crate::registry::WaypointId;

/// Convenient result alias for the RotaFácil library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a latitude/longitude pair falls outside the valid range.
    #[error("coordinates out of range: lat {lat}, lng {lng} (expected -90..=90, -180..=180)")]
    InvalidCoordinates { lat: f64, lng: f64 },

    /// Raised when manually entered coordinate text is not a number.
    #[error("invalid coordinate value: '{input}'")]
    UnparseableCoordinate { input: String },

    /// Raised when no map-link rule could pull coordinates out of pasted text.
    #[error("could not extract coordinates from '{input}'; enter them manually")]
    CoordinatesNotFound { input: String },

    /// Raised when an operation refers to a waypoint that is not registered.
    #[error("no waypoint with id {id}")]
    WaypointNotFound { id: WaypointId },

    /// The waypoint id counter cannot issue another id.
    #[error("waypoint ids exhausted; clear the saved state to start over")]
    IdsExhausted,

    /// Raised when a route is requested for an empty registry.
    #[error("at least one waypoint is required to compute a route")]
    NoWaypoints,

    /// The routing backend could not produce any usable result.
    #[error("routing service unavailable: {reason}")]
    RoutingUnavailable { reason: String },

    /// Raised when a route computation is requested while another is pending.
    #[error("a route computation is already in progress")]
    RouteInProgress,

    /// Raised when the registry changed while a route was being computed.
    #[error("waypoints changed while the route was being computed; result discarded")]
    StaleRoute,

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the state file")]
    ProjectDirsUnavailable,

    /// Raised when a state snapshot could not be read or written.
    #[error("state file {path}: {message}")]
    Persistence { path: PathBuf, message: String },

    /// Wrapper for JSON encoding/decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn routing_unavailable(reason: impl Into<String>) -> Self {
        Error::RoutingUnavailable {
            reason: reason.into(),
        }
    }

    /// Whether the error is a caller-side validation failure (bad input, no
    /// state was changed).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidCoordinates { .. } | Error::UnparseableCoordinate { .. }
        )
    }
}
