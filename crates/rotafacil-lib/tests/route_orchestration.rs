use std::sync::Arc;

use rotafacil_lib::test_utils::{ok_route, ok_trip, ScriptedBackend};
use rotafacil_lib::{
    BasePoint, Error, RouteOrchestrator, RouteStrategy, TripReply, WaypointId, WaypointRegistry,
};

fn registry_with(n: usize) -> WaypointRegistry {
    let mut registry = WaypointRegistry::default();
    for i in 0..n {
        registry
            .add(None, -2.53 - i as f64 * 0.01, -44.28)
            .expect("valid coordinates");
    }
    registry
}

#[tokio::test]
async fn zero_waypoints_never_contacts_backend() {
    let backend = Arc::new(ScriptedBackend::new());
    let orchestrator = RouteOrchestrator::new(backend.clone());

    let err = orchestrator
        .compute_route(&BasePoint::default(), &[])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NoWaypoints));
    assert_eq!(backend.route_calls() + backend.trip_calls(), 0);
}

#[tokio::test]
async fn single_waypoint_uses_direct_route_only() {
    let backend = Arc::new(ScriptedBackend::new().push_route(Ok(ok_route(2500.0, 420.0))));
    let orchestrator = RouteOrchestrator::new(backend.clone());
    let registry = registry_with(1);

    let result = orchestrator
        .compute_route(registry.base(), registry.list())
        .await
        .expect("direct route");

    assert_eq!(result.strategy, RouteStrategy::Direct);
    assert_eq!(result.stop_ids(), vec![WaypointId(1)]);
    assert_eq!(result.ordered_stops[0].order, 1);
    assert_eq!(result.total_distance_meters, 2500.0);
    assert_eq!(backend.trip_calls(), 0);

    // base -> stop, no return leg.
    let points = backend.route_points();
    assert_eq!(points[0].len(), 2);
    assert_eq!(points[0][0], registry.base().location);
}

#[tokio::test]
async fn optimized_trip_is_a_permutation_of_the_registry() {
    // base stays first, then W3, W1, W2.
    let backend = Arc::new(ScriptedBackend::new().push_trip(Ok(ok_trip(&[0, 2, 3, 1], 9000.0, 1800.0))));
    let orchestrator = RouteOrchestrator::new(backend.clone());
    let registry = registry_with(3);

    let result = orchestrator
        .compute_route(registry.base(), registry.list())
        .await
        .expect("optimized route");

    assert_eq!(result.strategy, RouteStrategy::Optimized);
    assert_eq!(
        result.stop_ids(),
        vec![WaypointId(3), WaypointId(1), WaypointId(2)]
    );
    let mut ids = result.stop_ids();
    ids.sort();
    let registered: Vec<_> = registry.list().iter().map(|w| w.id).collect();
    assert_eq!(ids, registered);
    assert_eq!(result.total_duration_seconds, 1800.0);
    assert_eq!(backend.route_calls(), 0);
}

#[tokio::test]
async fn non_ok_trip_falls_back_to_registry_order() {
    let failed_trip = TripReply {
        status: "NoTrips".to_string(),
        trips: Vec::new(),
        placements: Vec::new(),
    };
    let backend = Arc::new(
        ScriptedBackend::new()
            .push_trip(Ok(failed_trip))
            .push_route(Ok(ok_route(7000.0, 1500.0))),
    );
    let orchestrator = RouteOrchestrator::new(backend.clone());
    let registry = registry_with(3);

    let result = orchestrator
        .compute_route(registry.base(), registry.list())
        .await
        .expect("sequential fallback");

    assert_eq!(result.strategy, RouteStrategy::SequentialFallback);
    assert_eq!(
        result.stop_ids(),
        vec![WaypointId(1), WaypointId(2), WaypointId(3)]
    );
    assert_eq!(backend.trip_calls(), 1);
    assert_eq!(backend.route_calls(), 1);

    // base, three stops, base.
    let points = &backend.route_points()[0];
    assert_eq!(points.len(), 5);
    assert_eq!(points.first(), points.last());
}

#[tokio::test]
async fn trip_transport_failure_falls_back() {
    let backend = Arc::new(ScriptedBackend::new().push_route(Ok(ok_route(100.0, 10.0))));
    let orchestrator = RouteOrchestrator::new(backend.clone());
    let registry = registry_with(2);

    let result = orchestrator
        .compute_route(registry.base(), registry.list())
        .await
        .expect("fallback succeeds");
    assert_eq!(result.strategy, RouteStrategy::SequentialFallback);
}

#[tokio::test]
async fn inconsistent_placements_fall_back() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .push_trip(Ok(ok_trip(&[0, 1, 1], 1.0, 1.0)))
            .push_route(Ok(ok_route(100.0, 10.0))),
    );
    let orchestrator = RouteOrchestrator::new(backend.clone());
    let registry = registry_with(2);

    let result = orchestrator
        .compute_route(registry.base(), registry.list())
        .await
        .expect("fallback succeeds");
    assert_eq!(result.strategy, RouteStrategy::SequentialFallback);
}

#[tokio::test]
async fn both_requests_failing_is_unavailable() {
    let backend = Arc::new(ScriptedBackend::new());
    let orchestrator = RouteOrchestrator::new(backend.clone());
    let registry = registry_with(2);

    let err = orchestrator
        .compute_route(registry.base(), registry.list())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RoutingUnavailable { .. }));
    assert_eq!(backend.trip_calls(), 1);
    assert_eq!(backend.route_calls(), 1);
}

#[tokio::test]
async fn non_ok_direct_route_is_unavailable() {
    let mut reply = ok_route(0.0, 0.0);
    reply.status = "NoRoute".to_string();
    let backend = Arc::new(ScriptedBackend::new().push_route(Ok(reply)));
    let orchestrator = RouteOrchestrator::new(backend);
    let registry = registry_with(1);

    let err = orchestrator
        .compute_route(registry.base(), registry.list())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("NoRoute"));
}
