//! Round-trip route orchestration.
//!
//! This module provides:
//! - [`RouteStrategy`] - Which of the three terminal outcomes produced a route
//! - [`RouteResult`] / [`VisitStop`] - Canonical visit order plus metrics
//! - [`RouteOrchestrator`] - Strategy selection, backend calls and fallback
//! - [`RoutingBackend`] - The boundary the orchestrator talks to
//!
//! # Strategy selection
//!
//! | Waypoints | First request | On failure |
//! |-----------|---------------|------------|
//! | 0 | none ([`Error::NoWaypoints`]) | - |
//! | 1 | direct route base → stop | `RoutingUnavailable` |
//! | ≥ 2 | optimized round trip from base | sequential route base → stops → base |
//!
//! The sequential request is only issued after the trip request has failed,
//! never concurrently with it.

mod backend;

pub use backend::{RouteReply, RoutingBackend, TripLeg, TripPlacement, TripReply, STATUS_OK};

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::deeplink::directions_url;
use crate::error::{Error, Result};
use crate::geo::{BasePoint, Point};
use crate::registry::{Waypoint, WaypointId};

/// Terminal outcome of a route computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStrategy {
    /// Single stop: base → stop.
    Direct,
    /// Provider-optimized round trip.
    Optimized,
    /// Round trip in registry order after the optimizer was unavailable.
    SequentialFallback,
}

impl RouteStrategy {
    /// First strategy to attempt for `stops` waypoints. `None` when there is
    /// nothing to route.
    pub fn for_stop_count(stops: usize) -> Option<Self> {
        match stops {
            0 => None,
            1 => Some(RouteStrategy::Direct),
            _ => Some(RouteStrategy::Optimized),
        }
    }
}

impl fmt::Display for RouteStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteStrategy::Direct => "direct",
            RouteStrategy::Optimized => "optimized",
            RouteStrategy::SequentialFallback => "sequential_fallback",
        };
        f.write_str(value)
    }
}

/// A waypoint together with its 1-based position in the visit order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitStop {
    pub order: usize,
    #[serde(flatten)]
    pub waypoint: Waypoint,
}

/// Canonical visit order with aggregate metrics. The base is not part of
/// `ordered_stops`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub strategy: RouteStrategy,
    pub ordered_stops: Vec<VisitStop>,
    pub total_distance_meters: f64,
    pub total_duration_seconds: f64,
    pub path_geometry: Vec<Point>,
}

impl RouteResult {
    /// Waypoint ids in visit order.
    pub fn stop_ids(&self) -> Vec<WaypointId> {
        self.ordered_stops.iter().map(|s| s.waypoint.id).collect()
    }

    pub fn stop_count(&self) -> usize {
        self.ordered_stops.len()
    }

    /// Turn-by-turn link for a third-party map app. `None` without stops.
    pub fn directions_url(&self, base: &BasePoint) -> Option<String> {
        let stops: Vec<Point> = self
            .ordered_stops
            .iter()
            .map(|s| s.waypoint.location)
            .collect();
        directions_url(&base.location, &stops)
    }

    fn in_given_order(
        strategy: RouteStrategy,
        waypoints: &[Waypoint],
        reply: RouteReply,
    ) -> Self {
        Self {
            strategy,
            ordered_stops: number_stops(waypoints.iter().cloned()),
            total_distance_meters: reply.distance_meters,
            total_duration_seconds: reply.duration_seconds,
            path_geometry: reply.geometry,
        }
    }
}

fn number_stops(waypoints: impl Iterator<Item = Waypoint>) -> Vec<VisitStop> {
    waypoints
        .enumerate()
        .map(|(index, waypoint)| VisitStop {
            order: index + 1,
            waypoint,
        })
        .collect()
}

/// Chooses a strategy, calls the routing backend, and normalizes its reply.
#[derive(Clone)]
pub struct RouteOrchestrator {
    backend: Arc<dyn RoutingBackend>,
}

impl fmt::Debug for RouteOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteOrchestrator").finish_non_exhaustive()
    }
}

impl RouteOrchestrator {
    pub fn new(backend: Arc<dyn RoutingBackend>) -> Self {
        Self { backend }
    }

    /// Compute a route that starts at `base`, visits every waypoint, and (for
    /// two or more stops) returns to `base`.
    pub async fn compute_route(
        &self,
        base: &BasePoint,
        waypoints: &[Waypoint],
    ) -> Result<RouteResult> {
        let Some(strategy) = RouteStrategy::for_stop_count(waypoints.len()) else {
            return Err(Error::NoWaypoints);
        };

        let result = match strategy {
            RouteStrategy::Direct => self.direct(base, &waypoints[0]).await?,
            _ => self.optimized_or_sequential(base, waypoints).await?,
        };

        info!(
            strategy = %result.strategy,
            stops = result.stop_count(),
            distance_m = result.total_distance_meters,
            duration_s = result.total_duration_seconds,
            "route computed"
        );
        Ok(result)
    }

    async fn direct(&self, base: &BasePoint, waypoint: &Waypoint) -> Result<RouteResult> {
        let points = [base.location, waypoint.location];
        debug!(id = %waypoint.id, "requesting direct route");
        let reply = self.backend.route(&points).await?;
        if !reply.is_ok() {
            return Err(Error::routing_unavailable(format!(
                "route request returned status '{}'",
                reply.status
            )));
        }
        Ok(RouteResult::in_given_order(
            RouteStrategy::Direct,
            std::slice::from_ref(waypoint),
            reply,
        ))
    }

    async fn optimized_or_sequential(
        &self,
        base: &BasePoint,
        waypoints: &[Waypoint],
    ) -> Result<RouteResult> {
        let mut points = Vec::with_capacity(waypoints.len() + 1);
        points.push(base.location);
        points.extend(waypoints.iter().map(|w| w.location));

        debug!(points = points.len(), "requesting optimized trip");
        let outcome = match self.backend.trip(&points).await {
            Ok(reply) => reconcile_trip(reply, waypoints),
            Err(err) => Err(err.to_string()),
        };

        match outcome {
            Ok(result) => Ok(result),
            Err(reason) => {
                warn!(reason = %reason, "trip optimization unavailable; falling back to sequential route");
                self.sequential(base, waypoints).await
            }
        }
    }

    async fn sequential(&self, base: &BasePoint, waypoints: &[Waypoint]) -> Result<RouteResult> {
        let mut points = Vec::with_capacity(waypoints.len() + 2);
        points.push(base.location);
        points.extend(waypoints.iter().map(|w| w.location));
        points.push(base.location);

        let reply = self.backend.route(&points).await?;
        if !reply.is_ok() {
            return Err(Error::routing_unavailable(format!(
                "sequential route returned status '{}'",
                reply.status
            )));
        }
        Ok(RouteResult::in_given_order(
            RouteStrategy::SequentialFallback,
            waypoints,
            reply,
        ))
    }
}

/// Turn a trip reply into a visit order over `waypoints`.
///
/// `reply.placements` must hold exactly one entry per submitted point (the
/// base at index 0 followed by the waypoints), with distinct submitted
/// indices and distinct optimized positions. Anything else is reported as a
/// reason string so the caller can fall back.
fn reconcile_trip(
    reply: TripReply,
    waypoints: &[Waypoint],
) -> std::result::Result<RouteResult, String> {
    if !reply.is_ok() {
        return Err(format!("trip request returned status '{}'", reply.status));
    }
    let Some(leg) = reply.trips.into_iter().next() else {
        return Err("trip reply contained no trips".to_string());
    };

    let submitted = waypoints.len() + 1;
    if reply.placements.len() != submitted {
        return Err(format!(
            "trip reply placed {} points, {} were submitted",
            reply.placements.len(),
            submitted
        ));
    }

    let mut placements = reply.placements;
    placements.sort_by_key(|p| p.optimized_position);

    let mut seen = vec![false; submitted];
    for pair in placements.windows(2) {
        if pair[0].optimized_position == pair[1].optimized_position {
            return Err(format!(
                "trip reply repeats optimized position {}",
                pair[0].optimized_position
            ));
        }
    }
    for placement in &placements {
        match seen.get_mut(placement.submitted_index) {
            Some(slot) if !*slot => *slot = true,
            Some(_) => {
                return Err(format!(
                    "trip reply repeats submitted index {}",
                    placement.submitted_index
                ))
            }
            None => {
                return Err(format!(
                    "trip reply references unknown submitted index {}",
                    placement.submitted_index
                ))
            }
        }
    }

    let ordered = placements
        .iter()
        .filter(|p| p.submitted_index != 0)
        .map(|p| waypoints[p.submitted_index - 1].clone());

    Ok(RouteResult {
        strategy: RouteStrategy::Optimized,
        ordered_stops: number_stops(ordered),
        total_distance_meters: leg.distance_meters,
        total_duration_seconds: leg.duration_seconds,
        path_geometry: leg.geometry,
    })
}
