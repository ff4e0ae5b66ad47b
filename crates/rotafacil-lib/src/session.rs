//! The explicit session context: registry, current route and persistence.
//!
//! Every effective mutation bumps the registry revision, drops the current
//! route and saves a snapshot. Persistence is best-effort; failures are
//! logged at `warn` and never surfaced to the caller.
//!
//! Route computation is split into [`Session::begin_route`] and
//! [`Session::finish_route`] so a caller holding the session behind a lock can
//! release it while the routing backend is being queried. Only one
//! computation may be pending at a time, and a result computed against an
//! older revision is discarded rather than applied.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geo::{BasePoint, Point};
use crate::link::{self, LinkMatch};
use crate::registry::{Waypoint, WaypointId, WaypointRegistry};
use crate::routing::{RouteOrchestrator, RouteResult};
use crate::snapshot::SnapshotStore;
use crate::summary::{self, RouteSummary};

/// Inputs captured for one pending route computation.
///
/// Not `Clone`: each ticket is handed back to [`Session::finish_route`]
/// exactly once.
#[derive(Debug)]
pub struct RouteTicket {
    revision: u64,
    base: BasePoint,
    waypoints: Vec<Waypoint>,
}

impl RouteTicket {
    pub fn base(&self) -> &BasePoint {
        &self.base
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

pub struct Session {
    registry: WaypointRegistry,
    route: Option<RouteResult>,
    store: Arc<dyn SnapshotStore>,
    in_flight: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("registry", &self.registry)
            .field("route", &self.route)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Restore the session from `store`, falling back to the defaults when
    /// nothing was saved or the saved state cannot be used.
    pub fn open(store: Arc<dyn SnapshotStore>) -> Self {
        let registry = match store.load() {
            Ok(Some(snapshot)) => match WaypointRegistry::from_snapshot(snapshot) {
                Ok(registry) => {
                    debug!(waypoints = registry.len(), "session restored");
                    registry
                }
                Err(err) => {
                    warn!(error = %err, "saved state rejected; starting fresh");
                    WaypointRegistry::default()
                }
            },
            Ok(None) => WaypointRegistry::default(),
            Err(err) => {
                warn!(error = %err, "failed to load saved state; starting fresh");
                WaypointRegistry::default()
            }
        };
        Self::with_registry(registry, store)
    }

    pub fn with_registry(registry: WaypointRegistry, store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            registry,
            route: None,
            store,
            in_flight: false,
        }
    }

    pub fn registry(&self) -> &WaypointRegistry {
        &self.registry
    }

    pub fn base(&self) -> &BasePoint {
        self.registry.base()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        self.registry.list()
    }

    /// Route for the current registry contents, if one has been computed.
    pub fn current_route(&self) -> Option<&RouteResult> {
        self.route.as_ref()
    }

    pub fn summary(&self) -> Option<RouteSummary> {
        self.route
            .as_ref()
            .map(|route| summary::build(self.registry.base(), route))
    }

    pub fn directions_url(&self) -> Option<String> {
        self.route
            .as_ref()
            .and_then(|route| route.directions_url(self.registry.base()))
    }

    pub fn is_routing(&self) -> bool {
        self.in_flight
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub fn add_waypoint(&mut self, name: Option<&str>, lat: f64, lng: f64) -> Result<Waypoint> {
        let waypoint = self.registry.add(name, lat, lng)?;
        self.changed();
        Ok(waypoint)
    }

    /// Extract coordinates from pasted link text and register them.
    pub fn add_waypoint_from_link(&mut self, name: Option<&str>, text: &str) -> Result<Waypoint> {
        match link::extract(text) {
            LinkMatch::Matched { point, .. } => self.add_waypoint(name, point.lat, point.lng),
            LinkMatch::NoMatch => Err(Error::CoordinatesNotFound {
                input: text.trim().to_string(),
            }),
        }
    }

    pub fn remove_waypoint(&mut self, id: WaypointId) -> Result<()> {
        if !self.registry.remove(id) {
            return Err(Error::WaypointNotFound { id });
        }
        self.changed();
        Ok(())
    }

    /// Returns the number of waypoints removed.
    pub fn clear_waypoints(&mut self) -> usize {
        let count = self.registry.len();
        if self.registry.clear() {
            self.changed();
        }
        count
    }

    /// Move and/or rename the base. Coordinates are validated before anything
    /// changes.
    pub fn update_base(&mut self, location: Option<Point>, name: Option<&str>) -> Result<()> {
        if let Some(point) = location {
            point.validate()?;
        }
        let mut touched = false;
        if let Some(point) = location {
            self.registry.update_base(point.lat, point.lng)?;
            touched = true;
        }
        if let Some(name) = name {
            touched |= self.registry.rename_base(name);
        }
        if touched {
            self.changed();
        }
        Ok(())
    }

    fn changed(&mut self) {
        if self.route.take().is_some() {
            debug!("route invalidated");
        }
        self.persist();
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.registry.snapshot()) {
            warn!(error = %err, "failed to save state");
        }
    }

    // ========================================================================
    // Route computation
    // ========================================================================

    /// Claim the in-flight slot and capture the current inputs.
    pub fn begin_route(&mut self) -> Result<RouteTicket> {
        if self.in_flight {
            return Err(Error::RouteInProgress);
        }
        if self.registry.is_empty() {
            return Err(Error::NoWaypoints);
        }
        self.in_flight = true;
        Ok(RouteTicket {
            revision: self.registry.revision(),
            base: self.registry.base().clone(),
            waypoints: self.registry.list().to_vec(),
        })
    }

    /// Release the in-flight slot and apply `outcome` if it is still current.
    ///
    /// On failure the previous route (if any) is left in place.
    pub fn finish_route(
        &mut self,
        ticket: RouteTicket,
        outcome: Result<RouteResult>,
    ) -> Result<RouteResult> {
        self.in_flight = false;
        let result = outcome?;
        if ticket.revision != self.registry.revision() {
            warn!(
                computed_at = ticket.revision,
                current = self.registry.revision(),
                "discarding route computed for outdated waypoints"
            );
            return Err(Error::StaleRoute);
        }
        self.route = Some(result.clone());
        Ok(result)
    }

    /// Release the in-flight slot for a computation whose ticket was lost
    /// (e.g. the task running it panicked). Nothing is applied.
    pub fn abandon_route(&mut self) {
        if std::mem::take(&mut self.in_flight) {
            warn!("pending route computation abandoned");
        }
    }

    /// Begin, compute and finish in one call. Holds `&mut self` across the
    /// backend request.
    pub async fn compute_route(&mut self, orchestrator: &RouteOrchestrator) -> Result<RouteResult> {
        let ticket = self.begin_route()?;
        let outcome = orchestrator
            .compute_route(ticket.base(), ticket.waypoints())
            .await;
        self.finish_route(ticket, outcome)
    }
}
