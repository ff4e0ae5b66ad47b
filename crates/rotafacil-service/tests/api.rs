//! End-to-end tests for the `/api/v1` surface against in-memory state.

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use uuid::Uuid;

use rotafacil_service::app;
use rotafacil_service::test_utils::{ok_route, ok_trip, test_state, ScriptedBackend};

fn server_with(backend: ScriptedBackend) -> (TestServer, Arc<ScriptedBackend>) {
    let backend = Arc::new(backend);
    let server = TestServer::new(app(test_state(backend.clone()))).expect("test server");
    (server, backend)
}

fn server() -> TestServer {
    server_with(ScriptedBackend::new()).0
}

async fn add(server: &TestServer, body: Value) -> Value {
    let response = server.post("/api/v1/waypoints").json(&body).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

#[tokio::test]
async fn test_add_by_coordinates_and_list() {
    let server = server();

    let added = add(&server, json!({"name": "Padaria", "lat": -2.53, "lng": -44.28})).await;
    assert_eq!(added["id"], 1);
    assert_eq!(added["name"], "Padaria");
    assert_eq!(added["lat"], -2.53);

    let listed = server.get("/api/v1/waypoints").await;
    listed.assert_status_ok();
    let body = listed.json::<Value>();
    assert_eq!(body["waypoints"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["next_id"], 2);
}

#[tokio::test]
async fn test_add_from_link() {
    let server = server();

    let added = add(
        &server,
        json!({"link": "https://www.google.com/maps/place/Loja/@-2.5307,-44.3068,15z"}),
    )
    .await;
    assert_eq!(added["lat"], -2.5307);
    assert_eq!(added["lng"], -44.3068);
}

#[tokio::test]
async fn test_add_out_of_range_is_bad_request() {
    let server = server();

    let response = server
        .post("/api/v1/waypoints")
        .json(&json!({"lat": 91.0, "lng": 0.0}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let problem = response.json::<Value>();
    assert_eq!(problem["status"], 400);

    let listed = server.get("/api/v1/waypoints").await.json::<Value>();
    assert_eq!(listed["waypoints"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_add_requires_link_or_coordinates() {
    let server = server();

    let response = server
        .post("/api/v1/waypoints")
        .json(&json!({"name": "Nada", "lat": -2.5}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_unrecognized_link_is_unprocessable() {
    let server = server();

    let response = server
        .post("/api/v1/waypoints")
        .json(&json!({"link": "just some text"}))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let server = server();
    add(&server, json!({"lat": -2.53, "lng": -44.28})).await;
    add(&server, json!({"lat": -2.54, "lng": -44.29})).await;
    add(&server, json!({"lat": -2.55, "lng": -44.30})).await;

    server
        .delete("/api/v1/waypoints/2")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete("/api/v1/waypoints/2")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let cleared = server.delete("/api/v1/waypoints").await;
    cleared.assert_status_ok();
    assert_eq!(cleared.json::<Value>()["removed"], 2);

    let listed = server.get("/api/v1/waypoints").await.json::<Value>();
    assert_eq!(listed["waypoints"].as_array().map(Vec::len), Some(0));
    // ids keep counting after a clear
    assert_eq!(listed["next_id"], 4);
}

#[tokio::test]
async fn test_update_base() {
    let server = server();

    let response = server
        .put("/api/v1/base")
        .json(&json!({"lat": -2.5, "lng": -44.2, "name": "Depósito"}))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["base"]["name"], "Depósito");
    assert_eq!(body["base"]["lat"], -2.5);

    server
        .put("/api/v1/base")
        .json(&json!({"lat": -2.5}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_extract() {
    let server = server();

    let response = server
        .post("/api/v1/extract")
        .json(&json!({"text": "  https://maps.google.com/?q=-2.53,-44.28  "}))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["outcome"], "matched");
    assert_eq!(body["point"]["lat"], -2.53);
    assert_eq!(body["point"]["lng"], -44.28);

    server
        .post("/api/v1/extract")
        .json(&json!({"text": "no coordinates here"}))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_route_without_waypoints_is_bad_request() {
    let (server, backend) = server_with(ScriptedBackend::new());

    server
        .post("/api/v1/route")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_route_before_compute_is_not_found() {
    let server = server();

    server
        .get("/api/v1/route")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_single_stop_route() {
    let (server, backend) =
        server_with(ScriptedBackend::new().push_route(Ok(ok_route(5_000.0, 600.0))));
    add(&server, json!({"name": "Farmácia", "lat": -2.53, "lng": -44.28})).await;

    let response = server.post("/api/v1/route").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["route"]["strategy"], "direct");
    assert_eq!(body["summary"]["distance_label"], "5.0 km");
    assert_eq!(body["summary"]["duration_label"], "10 min");
    assert!(body["directions_url"]
        .as_str()
        .is_some_and(|url| url.starts_with("https://www.google.com/maps/dir/")));
    assert_eq!(backend.calls(), 1);

    let current = server.get("/api/v1/route").await;
    current.assert_status_ok();
    assert_eq!(current.json::<Value>()["route"]["strategy"], "direct");
}

#[tokio::test]
async fn test_optimized_route_follows_trip_order() {
    let (server, _) = server_with(
        ScriptedBackend::new().push_trip(Ok(ok_trip(&[0, 2, 1], 12_345.0, 1_500.0))),
    );
    add(&server, json!({"name": "A", "lat": -2.53, "lng": -44.28})).await;
    add(&server, json!({"name": "B", "lat": -2.54, "lng": -44.29})).await;

    let response = server.post("/api/v1/route").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["route"]["strategy"], "optimized");

    let names: Vec<&str> = body["route"]["ordered_stops"]
        .as_array()
        .map(|stops| stops.iter().filter_map(|s| s["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["B", "A"]);
    assert_eq!(body["summary"]["distance_label"], "12.3 km");
    assert_eq!(body["summary"]["duration_label"], "25 min");
    assert_eq!(body["summary"]["stop_count"], 2);
}

#[tokio::test]
async fn test_trip_failure_falls_back_to_sequential() {
    let (server, backend) =
        server_with(ScriptedBackend::new().push_route(Ok(ok_route(8_000.0, 900.0))));
    add(&server, json!({"name": "A", "lat": -2.53, "lng": -44.28})).await;
    add(&server, json!({"name": "B", "lat": -2.54, "lng": -44.29})).await;

    let response = server.post("/api/v1/route").await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["route"]["strategy"],
        "sequential_fallback"
    );
    assert_eq!(backend.calls(), 2);
}

#[tokio::test]
async fn test_unavailable_backend_is_service_unavailable() {
    let server = server();
    add(&server, json!({"lat": -2.53, "lng": -44.28})).await;

    server
        .post("/api/v1/route")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    server
        .get("/api/v1/route")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // the in-flight guard is released after a failure
    let ready = server.get("/health/ready").await.json::<Value>();
    assert_eq!(ready["status"], "ok");
}

#[tokio::test]
async fn test_edit_invalidates_route() {
    let (server, _) =
        server_with(ScriptedBackend::new().push_route(Ok(ok_route(5_000.0, 600.0))));
    add(&server, json!({"lat": -2.53, "lng": -44.28})).await;
    server.post("/api/v1/route").await.assert_status_ok();

    add(&server, json!({"lat": -2.54, "lng": -44.29})).await;
    server
        .get("/api/v1/route")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoints() {
    let server = server();

    let live = server.get("/health/live").await;
    live.assert_status_ok();
    assert_eq!(live.json::<Value>()["status"], "ok");

    add(&server, json!({"lat": -2.53, "lng": -44.28})).await;
    let ready = server.get("/health/ready").await.json::<Value>();
    assert_eq!(ready["waypoints"], 1);
    assert_eq!(ready["route_ready"], false);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = server();

    let response = server
        .get("/api/v1/waypoints")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-42"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "trace-42");

    let generated = server.get("/api/v1/waypoints").await;
    let id = generated.header("x-request-id");
    let parsed = Uuid::parse_str(id.to_str().expect("ascii header")).expect("uuid request id");
    assert_eq!(parsed.get_version_num(), 7);
}
