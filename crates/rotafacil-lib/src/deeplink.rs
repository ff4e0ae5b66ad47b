//! Links that hand a finished route to an external map app.

use reqwest::Url;

use crate::geo::Point;

const GOOGLE_MAPS_DIR: &str = "https://www.google.com/maps/dir/";

fn lat_lng(point: &Point) -> String {
    format!("{},{}", point.lat, point.lng)
}

/// Google Maps driving directions from `base` through `stops` and back.
///
/// Returns `None` when there are no stops.
pub fn directions_url(base: &Point, stops: &[Point]) -> Option<String> {
    if stops.is_empty() {
        return None;
    }
    let origin = lat_lng(base);
    let waypoints = stops.iter().map(lat_lng).collect::<Vec<_>>().join("|");
    let params = [
        ("api", "1"),
        ("origin", origin.as_str()),
        ("destination", origin.as_str()),
        ("waypoints", waypoints.as_str()),
        ("travelmode", "driving"),
    ];
    Url::parse_with_params(GOOGLE_MAPS_DIR, params)
        .ok()
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_without_stops() {
        assert!(directions_url(&Point::new(0.0, 0.0), &[]).is_none());
    }

    #[test]
    fn round_trip_from_base() {
        let base = Point::new(-2.5297, -44.2825);
        let stops = [Point::new(-2.53, -44.28), Point::new(-2.54, -44.29)];
        let url = Url::parse(&directions_url(&base, &stops).unwrap()).unwrap();

        assert!(url.as_str().starts_with(GOOGLE_MAPS_DIR));
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            query,
            vec![
                ("api".into(), "1".into()),
                ("origin".into(), "-2.5297,-44.2825".into()),
                ("destination".into(), "-2.5297,-44.2825".into()),
                ("waypoints".into(), "-2.53,-44.28|-2.54,-44.29".into()),
                ("travelmode".into(), "driving".into()),
            ]
        );
    }
}
