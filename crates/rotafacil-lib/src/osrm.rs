use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geo::Point;
use crate::routing::{RouteReply, RoutingBackend, TripLeg, TripPlacement, TripReply};

/// Public OSRM demo server.
pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";
pub const DEFAULT_PROFILE: &str = "driving";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const OSRM_URL_ENV: &str = "ROTAFACIL_OSRM_URL";
pub const OSRM_PROFILE_ENV: &str = "ROTAFACIL_OSRM_PROFILE";
pub const OSRM_TIMEOUT_ENV: &str = "ROTAFACIL_OSRM_TIMEOUT_SECS";

/// Where and how to reach an OSRM-compatible server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout: Duration,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OSRM_URL.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl OsrmConfig {
    /// Read `ROTAFACIL_OSRM_URL`, `ROTAFACIL_OSRM_PROFILE` and
    /// `ROTAFACIL_OSRM_TIMEOUT_SECS`, falling back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = non_empty_var(OSRM_URL_ENV) {
            config.base_url = url;
        }
        if let Some(profile) = non_empty_var(OSRM_PROFILE_ENV) {
            config.profile = profile;
        }
        if let Some(raw) = non_empty_var(OSRM_TIMEOUT_ENV) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!(
                    value = %raw,
                    default = DEFAULT_TIMEOUT_SECS,
                    "ignoring invalid {}", OSRM_TIMEOUT_ENV
                ),
            }
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `{base}/route/v1/{profile}/{lng,lat;...}?overview=full&geometries=geojson`
    pub fn route_url(&self, points: &[Point]) -> Result<Url> {
        self.service_url("route", points, &[])
    }

    /// Round trip that keeps `points[0]` as the first stop.
    pub fn trip_url(&self, points: &[Point]) -> Result<Url> {
        self.service_url(
            "trip",
            points,
            &[("source", "first"), ("roundtrip", "true")],
        )
    }

    fn service_url(&self, service: &str, points: &[Point], extra: &[(&str, &str)]) -> Result<Url> {
        let coordinates = points
            .iter()
            .map(Point::lng_lat)
            .collect::<Vec<_>>()
            .join(";");
        let raw = format!(
            "{base}/{service}/v1/{profile}/{coordinates}",
            base = self.base_url.trim_end_matches('/'),
            profile = self.profile,
        );
        let mut url = Url::parse(&raw).map_err(|e| {
            Error::routing_unavailable(format!("invalid routing url '{}': {}", self.base_url, e))
        })?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in extra {
                query.append_pair(key, value);
            }
            query.append_pair("overview", "full");
            query.append_pair("geometries", "geojson");
        }
        Ok(url)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// [`RoutingBackend`] backed by the OSRM HTTP API.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    http: Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent())
            .build()
            .map_err(|e| Error::routing_unavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(OsrmConfig::from_env())
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }

    /// OSRM reports request-level failures (`NoRoute`, `InvalidQuery`, ...) in
    /// the body alongside a 4xx status, so the body is decoded regardless of
    /// the HTTP status.
    async fn fetch<T: for<'de> Deserialize<'de>>(&self, url: Url) -> Result<T> {
        debug!(url = %url, "calling routing service");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::routing_unavailable(format!("request failed: {e}")))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::routing_unavailable(format!("failed to read response: {e}")))?;
        serde_json::from_str(&body).map_err(|e| {
            Error::routing_unavailable(format!("unexpected response (HTTP {status}): {e}"))
        })
    }
}

fn user_agent() -> String {
    format!("rotafacil-lib/{version}", version = env!("CARGO_PKG_VERSION"))
}

#[async_trait]
impl RoutingBackend for OsrmClient {
    async fn route(&self, points: &[Point]) -> Result<RouteReply> {
        let url = self.config.route_url(points)?;
        let wire: WireRouteResponse = self.fetch(url).await?;
        Ok(wire.into_reply())
    }

    async fn trip(&self, points: &[Point]) -> Result<TripReply> {
        let url = self.config.trip_url(points)?;
        let wire: WireTripResponse = self.fetch(url).await?;
        Ok(wire.into_reply())
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct WireGeometry {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>,
}

impl WireGeometry {
    /// GeoJSON positions are `[lng, lat]`.
    fn into_points(self) -> Vec<Point> {
        self.coordinates
            .into_iter()
            .map(|[lng, lat]| Point::new(lat, lng))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct WireRoute {
    distance: f64,
    duration: f64,
    geometry: WireGeometry,
}

#[derive(Debug, Deserialize)]
struct WireRouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<WireRoute>,
}

impl WireRouteResponse {
    fn into_reply(self) -> RouteReply {
        let code = self.code;
        match self.routes.into_iter().next() {
            Some(route) => RouteReply {
                status: code,
                distance_meters: route.distance,
                duration_seconds: route.duration,
                geometry: route.geometry.into_points(),
            },
            None => RouteReply {
                status: if code == crate::routing::STATUS_OK {
                    "NoRoute".to_string()
                } else {
                    code
                },
                distance_meters: 0.0,
                duration_seconds: 0.0,
                geometry: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireTripWaypoint {
    waypoint_index: usize,
}

#[derive(Debug, Deserialize)]
struct WireTripResponse {
    code: String,
    #[serde(default)]
    trips: Vec<WireRoute>,
    #[serde(default)]
    waypoints: Vec<WireTripWaypoint>,
}

impl WireTripResponse {
    /// `waypoints` follows the submitted order; each entry's
    /// `waypoint_index` is its position within the trip.
    fn into_reply(self) -> TripReply {
        TripReply {
            status: self.code,
            trips: self
                .trips
                .into_iter()
                .map(|trip| TripLeg {
                    distance_meters: trip.distance,
                    duration_seconds: trip.duration,
                    geometry: trip.geometry.into_points(),
                })
                .collect(),
            placements: self
                .waypoints
                .into_iter()
                .enumerate()
                .map(|(submitted_index, wp)| TripPlacement {
                    submitted_index,
                    optimized_position: wp.waypoint_index,
                })
                .collect(),
        }
    }
}
