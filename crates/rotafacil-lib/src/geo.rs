//! Geographic primitives shared by every other module.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Latitude of the default base ("Central (Base)").
pub const DEFAULT_BASE_LAT: f64 = -2.5297;
/// Longitude of the default base.
pub const DEFAULT_BASE_LNG: f64 = -44.2825;
/// Display name of the default base.
pub const DEFAULT_BASE_NAME: &str = "Central (Base)";

/// A WGS84 coordinate pair in decimal degrees.
///
/// Points coming out of [`crate::link::extract`] are not range checked; use
/// [`Point::validated`] (or [`Point::validate`]) before storing one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build a point, rejecting coordinates outside `-90..=90` / `-180..=180`.
    pub fn validated(lat: f64, lng: f64) -> Result<Self> {
        Self::new(lat, lng).validate()
    }

    /// Return `self` if it lies within the valid coordinate range.
    pub fn validate(self) -> Result<Self> {
        if self.is_in_range() {
            Ok(self)
        } else {
            Err(Error::InvalidCoordinates {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }

    /// NaN and infinities are never in range.
    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// `"lng,lat"`, the ordering used in OSRM coordinate paths.
    pub(crate) fn lng_lat(&self) -> String {
        format!("{},{}", self.lng, self.lat)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Parse manually entered coordinate text (e.g. a latitude form field).
pub fn parse_coordinate(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    f64::from_str(trimmed)
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| Error::UnparseableCoordinate {
            input: trimmed.to_string(),
        })
}

/// The fixed start and end point of every route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasePoint {
    #[serde(flatten)]
    pub location: Point,
    #[serde(default = "default_base_name")]
    pub name: String,
}

fn default_base_name() -> String {
    DEFAULT_BASE_NAME.to_string()
}

impl BasePoint {
    pub fn new(name: impl Into<String>, location: Point) -> Self {
        Self {
            location,
            name: name.into(),
        }
    }
}

impl Default for BasePoint {
    fn default() -> Self {
        Self::new(
            DEFAULT_BASE_NAME,
            Point::new(DEFAULT_BASE_LAT, DEFAULT_BASE_LNG),
        )
    }
}
