//! Routing fixtures shared by this crate's tests and by downstream crates
//! (enable the `test-utils` feature).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::geo::Point;
use crate::routing::{RouteReply, RoutingBackend, TripLeg, TripPlacement, TripReply, STATUS_OK};

/// Backend that replays queued replies and records the points it was asked
/// about. An empty queue answers with a transport failure.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    routes: Mutex<VecDeque<Result<RouteReply>>>,
    trips: Mutex<VecDeque<Result<TripReply>>>,
    route_calls: AtomicUsize,
    trip_calls: AtomicUsize,
    seen_route_points: Mutex<Vec<Vec<Point>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_route(self, reply: Result<RouteReply>) -> Self {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
        self
    }

    pub fn push_trip(self, reply: Result<TripReply>) -> Self {
        self.trips
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
        self
    }

    pub fn route_calls(&self) -> usize {
        self.route_calls.load(Ordering::SeqCst)
    }

    pub fn trip_calls(&self) -> usize {
        self.trip_calls.load(Ordering::SeqCst)
    }

    /// `route` + `trip` calls.
    pub fn calls(&self) -> usize {
        self.route_calls() + self.trip_calls()
    }

    /// Points passed to each `route` call, in call order.
    pub fn route_points(&self) -> Vec<Vec<Point>> {
        self.seen_route_points
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn unscripted() -> Error {
    Error::RoutingUnavailable {
        reason: "no scripted reply".to_string(),
    }
}

#[async_trait]
impl RoutingBackend for ScriptedBackend {
    async fn route(&self, points: &[Point]) -> Result<RouteReply> {
        self.route_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_route_points
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(points.to_vec());
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(unscripted()))
    }

    async fn trip(&self, _points: &[Point]) -> Result<TripReply> {
        self.trip_calls.fetch_add(1, Ordering::SeqCst);
        self.trips
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(unscripted()))
    }
}

pub fn ok_route(distance: f64, duration: f64) -> RouteReply {
    RouteReply {
        status: STATUS_OK.to_string(),
        distance_meters: distance,
        duration_seconds: duration,
        geometry: vec![Point::new(-2.5297, -44.2825), Point::new(-2.53, -44.28)],
    }
}

/// Trip reply whose `positions[i]` is the optimized position of submitted
/// point `i`.
pub fn ok_trip(positions: &[usize], distance: f64, duration: f64) -> TripReply {
    TripReply {
        status: STATUS_OK.to_string(),
        trips: vec![TripLeg {
            distance_meters: distance,
            duration_seconds: duration,
            geometry: vec![Point::new(-2.5297, -44.2825)],
        }],
        placements: positions
            .iter()
            .enumerate()
            .map(|(submitted_index, &optimized_position)| TripPlacement {
                submitted_index,
                optimized_position,
            })
            .collect(),
    }
}
