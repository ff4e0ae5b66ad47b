//! The routing boundary: a driving-directions provider reached over the
//! network.
//!
//! Implementations translate their wire format into the reply types below and
//! report transport problems (unreachable host, timeout, undecodable body) as
//! [`Error::RoutingUnavailable`](crate::Error::RoutingUnavailable). A reply
//! with a non-[`STATUS_OK`] status is *not* an `Err`: the orchestrator decides
//! what to do with it.

use async_trait::async_trait;

use crate::error::Result;
use crate::geo::Point;

/// Status string the provider uses for a successful reply.
pub const STATUS_OK: &str = "Ok";

/// Reply to a fixed-order route request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteReply {
    pub status: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// Road-following polyline.
    pub geometry: Vec<Point>,
}

impl RouteReply {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// One closed loop proposed by the trip optimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct TripLeg {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub geometry: Vec<Point>,
}

/// Where the optimizer placed one submitted point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripPlacement {
    /// Index of the point in the submitted list.
    pub submitted_index: usize,
    /// Zero-based position of the point in the optimized visit order.
    pub optimized_position: usize,
}

/// Reply to a trip-optimization request.
#[derive(Debug, Clone, PartialEq)]
pub struct TripReply {
    pub status: String,
    pub trips: Vec<TripLeg>,
    /// One entry per submitted point.
    pub placements: Vec<TripPlacement>,
}

impl TripReply {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Driving-directions provider.
#[async_trait]
pub trait RoutingBackend: Send + Sync {
    /// Route through `points` in the given order, no reordering.
    async fn route(&self, points: &[Point]) -> Result<RouteReply>;

    /// Optimized closed loop over `points`, starting and ending at
    /// `points[0]`; the provider may reorder every other point.
    async fn trip(&self, points: &[Point]) -> Result<TripReply>;
}
