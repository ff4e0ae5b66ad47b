//! Human-readable rendering of a computed route.

use serde::Serialize;

use crate::geo::BasePoint;
use crate::registry::WaypointId;
use crate::routing::{RouteResult, RouteStrategy};

/// Whether a step is the base or a registered waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Base,
    Stop,
}

/// Role of a step in the itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepRole {
    Start,
    Stop,
    Return,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStep {
    pub label: String,
    pub kind: StepKind,
    pub role: StepRole,
    /// 1-based stop number; `None` for the base.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waypoint_id: Option<WaypointId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub strategy: RouteStrategy,
    pub distance_label: String,
    pub duration_label: String,
    pub stop_count: usize,
    /// Starts and ends with the base.
    pub steps: Vec<SummaryStep>,
}

/// Build the itinerary summary for `result`. Pure.
pub fn build(base: &BasePoint, result: &RouteResult) -> RouteSummary {
    let base_step = |role| SummaryStep {
        label: base.name.clone(),
        kind: StepKind::Base,
        role,
        order: None,
        waypoint_id: None,
    };

    let mut steps = Vec::with_capacity(result.ordered_stops.len() + 2);
    steps.push(base_step(StepRole::Start));
    steps.extend(result.ordered_stops.iter().map(|stop| SummaryStep {
        label: stop.waypoint.name.clone(),
        kind: StepKind::Stop,
        role: StepRole::Stop,
        order: Some(stop.order),
        waypoint_id: Some(stop.waypoint.id),
    }));
    steps.push(base_step(StepRole::Return));

    RouteSummary {
        strategy: result.strategy,
        distance_label: format_distance(result.total_distance_meters),
        duration_label: format_duration(result.total_duration_seconds),
        stop_count: result.stop_count(),
        steps,
    }
}

/// Kilometres with one decimal, e.g. `"12.3 km"`.
pub fn format_distance(meters: f64) -> String {
    format!("{:.1} km", meters / 1000.0)
}

/// Rounds to the nearest minute first, so 3599 s reads `"1h 0min"`.
pub fn format_duration(seconds: f64) -> String {
    let total_minutes = (seconds.max(0.0) / 60.0).round() as u64;
    let (hours, minutes) = (total_minutes / 60, total_minutes % 60);
    if hours > 0 {
        format!("{hours}h {minutes}min")
    } else {
        format!("{minutes} min")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Point;
    use crate::registry::Waypoint;
    use crate::routing::VisitStop;

    fn result_with(names: &[&str]) -> RouteResult {
        RouteResult {
            strategy: RouteStrategy::Optimized,
            ordered_stops: names
                .iter()
                .enumerate()
                .map(|(i, name)| VisitStop {
                    order: i + 1,
                    waypoint: Waypoint {
                        id: WaypointId(10 + i as u64),
                        name: name.to_string(),
                        location: Point::new(0.0, 0.0),
                    },
                })
                .collect(),
            total_distance_meters: 12_345.0,
            total_duration_seconds: 5400.0,
            path_geometry: Vec::new(),
        }
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(5400.0), "1h 30min");
        assert_eq!(format_duration(90.0), "2 min");
        assert_eq!(format_duration(29.0), "0 min");
        assert_eq!(format_duration(3599.0), "1h 0min");
        assert_eq!(format_duration(7260.0), "2h 1min");
    }

    #[test]
    fn distance_formatting() {
        assert_eq!(format_distance(12_345.0), "12.3 km");
        assert_eq!(format_distance(0.0), "0.0 km");
    }

    #[test]
    fn steps_start_and_end_at_base() {
        let base = BasePoint::default();
        let summary = build(&base, &result_with(&["Ana", "Bruno"]));

        assert_eq!(summary.stop_count, 2);
        assert_eq!(summary.distance_label, "12.3 km");
        assert_eq!(summary.duration_label, "1h 30min");

        let labels: Vec<_> = summary.steps.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Central (Base)", "Ana", "Bruno", "Central (Base)"]);
        assert_eq!(summary.steps[0].role, StepRole::Start);
        assert_eq!(summary.steps[3].role, StepRole::Return);
        assert_eq!(summary.steps[1].order, Some(1));
        assert_eq!(summary.steps[2].kind, StepKind::Stop);
        assert_eq!(summary.steps[0].order, None);
    }
}
