//! Ordered waypoint collection plus the session's base point.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geo::{BasePoint, Point};
use crate::snapshot::StateSnapshot;

/// Stable waypoint identity. Issued from a monotonic counter and never reused,
/// so a stale id always resolves to "absent".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaypointId(pub u64);

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A location to visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: WaypointId,
    pub name: String,
    #[serde(flatten)]
    pub location: Point,
}

/// Owns the base point and the waypoints in insertion (display) order.
#[derive(Debug, Clone)]
pub struct WaypointRegistry {
    base: BasePoint,
    waypoints: Vec<Waypoint>,
    next_id: u64,
    revision: u64,
}

impl Default for WaypointRegistry {
    fn default() -> Self {
        Self::new(BasePoint::default())
    }
}

impl WaypointRegistry {
    pub fn new(base: BasePoint) -> Self {
        Self {
            base,
            waypoints: Vec::new(),
            next_id: 1,
            revision: 0,
        }
    }

    /// Register a new waypoint at the end of the list.
    ///
    /// A missing or blank `name` becomes `"Cliente {n}"` where `n` is the new
    /// list length. Out-of-range coordinates are rejected without mutating.
    pub fn add(&mut self, name: Option<&str>, lat: f64, lng: f64) -> Result<Waypoint> {
        let location = Point::validated(lat, lng)?;
        let following = self.next_id.checked_add(1).ok_or(Error::IdsExhausted)?;
        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Cliente {}", self.waypoints.len() + 1),
        };

        let waypoint = Waypoint {
            id: WaypointId(self.next_id),
            name,
            location,
        };
        self.next_id = following;
        self.waypoints.push(waypoint.clone());
        self.touch();

        debug!(id = %waypoint.id, name = %waypoint.name, "waypoint added");
        Ok(waypoint)
    }

    /// Remove a waypoint by id. Returns `false` when the id is unknown.
    pub fn remove(&mut self, id: WaypointId) -> bool {
        let Some(index) = self.waypoints.iter().position(|w| w.id == id) else {
            return false;
        };
        let removed = self.waypoints.remove(index);
        self.touch();
        debug!(id = %removed.id, name = %removed.name, "waypoint removed");
        true
    }

    /// Remove every waypoint. Returns `false` (and changes nothing) when the
    /// registry was already empty.
    pub fn clear(&mut self) -> bool {
        if self.waypoints.is_empty() {
            return false;
        }
        let count = self.waypoints.len();
        self.waypoints.clear();
        self.touch();
        debug!(count, "waypoints cleared");
        true
    }

    /// Waypoints in insertion order.
    pub fn list(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn base(&self) -> &BasePoint {
        &self.base
    }

    /// Move the base point. The display name is kept.
    pub fn update_base(&mut self, lat: f64, lng: f64) -> Result<()> {
        self.base.location = Point::validated(lat, lng)?;
        self.touch();
        debug!(lat, lng, "base updated");
        Ok(())
    }

    /// Rename the base point. Blank names are ignored.
    pub fn rename_base(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || name == self.base.name {
            return false;
        }
        self.base.name = name.to_string();
        self.touch();
        true
    }

    /// Id that the next [`add`](Self::add) will assign.
    pub fn next_id(&self) -> WaypointId {
        WaypointId(self.next_id)
    }

    /// Counter bumped by every effective mutation. A route computed at one
    /// revision is stale at any other.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Durable projection of the registry.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            base: self.base.clone(),
            waypoints: self.waypoints.clone(),
            next_id: self.next_id,
        }
    }

    /// Rebuild a registry from a restored snapshot.
    ///
    /// Waypoints with out-of-range coordinates, duplicate ids, or an id with
    /// no successor are dropped, and the id counter is raised past every
    /// restored id.
    pub fn from_snapshot(snapshot: StateSnapshot) -> Result<Self> {
        let base = BasePoint {
            location: snapshot.base.location.validate()?,
            name: snapshot.base.name,
        };

        let mut waypoints: Vec<Waypoint> = Vec::with_capacity(snapshot.waypoints.len());
        for waypoint in snapshot.waypoints {
            if !waypoint.location.is_in_range() {
                warn!(id = %waypoint.id, "dropping restored waypoint with invalid coordinates");
                continue;
            }
            if waypoint.id.0 == u64::MAX {
                warn!(id = %waypoint.id, "dropping restored waypoint with exhausted id");
                continue;
            }
            if waypoints.iter().any(|w| w.id == waypoint.id) {
                warn!(id = %waypoint.id, "dropping restored waypoint with duplicate id");
                continue;
            }
            waypoints.push(waypoint);
        }

        let max_id = waypoints.iter().map(|w| w.id.0).max().unwrap_or(0);
        let next_id = snapshot.next_id.max(max_id + 1).max(1);

        Ok(Self {
            base,
            waypoints,
            next_id,
            revision: 0,
        })
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}
