//! RotaFácil library entry points.
//!
//! This crate owns everything a delivery round needs: the base point and the
//! registered waypoints, coordinate extraction from pasted map links, round
//! trip computation against an OSRM-compatible routing service, the
//! human-readable summary, and snapshot persistence. Front ends (CLI, HTTP
//! service) should drive a [`Session`] instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod deeplink;
pub mod error;
pub mod geo;
pub mod link;
pub mod osrm;
pub mod registry;
pub mod routing;
pub mod session;
pub mod snapshot;
pub mod summary;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use deeplink::directions_url;
pub use error::{Error, Result};
pub use geo::{parse_coordinate, BasePoint, Point};
pub use link::{extract, LinkMatch, LinkRule};
pub use osrm::{OsrmClient, OsrmConfig};
pub use registry::{Waypoint, WaypointId, WaypointRegistry};
pub use routing::{
    RouteOrchestrator, RouteReply, RouteResult, RouteStrategy, RoutingBackend, TripLeg,
    TripPlacement, TripReply, VisitStop,
};
pub use session::{RouteTicket, Session};
pub use snapshot::{default_state_path, JsonFileStore, MemoryStore, SnapshotStore, StateSnapshot};
pub use summary::{RouteSummary, StepKind, StepRole, SummaryStep};
