//! Request types and validation for HTTP endpoints.

use serde::{Deserialize, Serialize};

use rotafacil_lib::Point;

use crate::ProblemDetails;

/// Validation trait for request types.
///
/// Implementations should validate all fields and return a `ProblemDetails`
/// error for invalid input.
pub trait Validate {
    /// The `request_id` is used to populate the `instance` field of any
    /// returned `ProblemDetails`.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Body of `POST /api/v1/waypoints`: either a map link or a coordinate pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddWaypointRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,

    /// Pasted map link or `"lat,lng"` text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Where the coordinates of a new waypoint come from, after validation.
#[derive(Debug, Clone, PartialEq)]
pub enum WaypointInput<'a> {
    Link(&'a str),
    Coordinates(Point),
}

impl AddWaypointRequest {
    /// Resolved input. Only meaningful after [`Validate::validate`] passed.
    pub fn input(&self) -> Option<WaypointInput<'_>> {
        match (&self.link, self.lat, self.lng) {
            (Some(link), None, None) => Some(WaypointInput::Link(link)),
            (None, Some(lat), Some(lng)) => Some(WaypointInput::Coordinates(Point::new(lat, lng))),
            _ => None,
        }
    }
}

impl Validate for AddWaypointRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if let Some(link) = &self.link {
            if self.lat.is_some() || self.lng.is_some() {
                return Err(Box::new(ProblemDetails::bad_request(
                    "Provide either 'link' or 'lat'/'lng', not both",
                    request_id,
                )));
            }
            if link.trim().is_empty() {
                return Err(Box::new(ProblemDetails::bad_request(
                    "The 'link' field cannot be empty",
                    request_id,
                )));
            }
            return Ok(());
        }

        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => validate_point(lat, lng, request_id),
            _ => Err(Box::new(ProblemDetails::bad_request(
                "Provide a 'link' or both 'lat' and 'lng'",
                request_id,
            ))),
        }
    }
}

/// Body of `PUT /api/v1/base`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBaseRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UpdateBaseRequest {
    pub fn location(&self) -> Option<Point> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Point::new(lat, lng)),
            _ => None,
        }
    }
}

impl Validate for UpdateBaseRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => validate_point(lat, lng, request_id)?,
            (None, None) => {}
            _ => {
                return Err(Box::new(ProblemDetails::bad_request(
                    "The 'lat' and 'lng' fields must be given together",
                    request_id,
                )))
            }
        }

        if self.location().is_none() && self.name.is_none() {
            return Err(Box::new(ProblemDetails::bad_request(
                "Nothing to update: provide 'lat'/'lng' and/or 'name'",
                request_id,
            )));
        }

        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(Box::new(ProblemDetails::bad_request(
                    "The 'name' field cannot be empty",
                    request_id,
                )));
            }
        }

        Ok(())
    }
}

/// Body of `POST /api/v1/extract`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

impl Validate for ExtractRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if self.text.trim().is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'text' field is required and cannot be empty",
                request_id,
            )));
        }
        Ok(())
    }
}

fn validate_point(lat: f64, lng: f64, request_id: &str) -> Result<(), Box<ProblemDetails>> {
    Point::validated(lat, lng)
        .map(|_| ())
        .map_err(|e| Box::new(ProblemDetails::bad_request(e.to_string(), request_id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_waypoint_with_link() {
        let request = AddWaypointRequest {
            link: Some("https://maps.google.com/@-2.53,-44.28,15z".into()),
            ..Default::default()
        };
        assert!(request.validate("req-1").is_ok());
        assert!(matches!(request.input(), Some(WaypointInput::Link(_))));
    }

    #[test]
    fn test_add_waypoint_with_coordinates() {
        let request = AddWaypointRequest {
            lat: Some(-2.53),
            lng: Some(-44.28),
            ..Default::default()
        };
        assert!(request.validate("req-1").is_ok());
        assert_eq!(
            request.input(),
            Some(WaypointInput::Coordinates(Point::new(-2.53, -44.28)))
        );
    }

    #[test]
    fn test_add_waypoint_rejects_mixed_or_missing_input() {
        let mixed = AddWaypointRequest {
            lat: Some(1.0),
            link: Some("1,1".into()),
            ..Default::default()
        };
        assert_eq!(mixed.validate("req-1").unwrap_err().status, 400);

        let missing = AddWaypointRequest {
            lat: Some(1.0),
            ..Default::default()
        };
        assert!(missing.validate("req-1").is_err());
    }

    #[test]
    fn test_add_waypoint_rejects_out_of_range() {
        let request = AddWaypointRequest {
            lat: Some(-91.0),
            lng: Some(0.0),
            ..Default::default()
        };
        let problem = request.validate("req-2").unwrap_err();
        assert!(problem.detail.as_deref().unwrap().contains("out of range"));
    }

    #[test]
    fn test_update_base_requires_pair_and_content() {
        let half = UpdateBaseRequest {
            lat: Some(1.0),
            ..Default::default()
        };
        assert!(half.validate("req-3").is_err());

        let empty = UpdateBaseRequest::default();
        assert!(empty.validate("req-3").is_err());

        let rename = UpdateBaseRequest {
            name: Some("Depósito".into()),
            ..Default::default()
        };
        assert!(rename.validate("req-3").is_ok());
    }

    #[test]
    fn test_extract_rejects_blank_text() {
        let request = ExtractRequest { text: "   ".into() };
        assert!(request.validate("req-4").is_err());
    }
}
