//! axum handlers for the `/api/v1` surface.
//!
//! Handlers stay thin: validate, call into the session, map library errors
//! to [`ProblemDetails`], record metrics.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, warn};

use rotafacil_lib::{extract, LinkMatch, Session, WaypointId};

use crate::metrics::{record_route_computed, record_route_failed, record_route_stops, record_waypoint_event};
use crate::middleware::RequestId;
use crate::problem::{failure_reason, from_lib_error};
use crate::request::{AddWaypointRequest, ExtractRequest, UpdateBaseRequest, Validate, WaypointInput};
use crate::response::{ClearedView, RegistryView, RouteView, ServiceResponse};
use crate::{AppState, ProblemDetails};

/// Either a success payload or an RFC 9457 problem.
type ApiResult<T> = Result<T, ProblemDetails>;

fn registry_view(session: &Session) -> RegistryView {
    RegistryView {
        base: session.base().clone(),
        waypoints: session.waypoints().to_vec(),
        next_id: session.registry().next_id(),
    }
}

fn route_view(session: &Session) -> Option<RouteView> {
    let route = session.current_route()?.clone();
    let summary = session.summary()?;
    Some(RouteView {
        route,
        summary,
        directions_url: session.directions_url(),
    })
}

/// `GET /api/v1/waypoints`
pub async fn list_waypoints(State(state): State<AppState>) -> ServiceResponse<RegistryView> {
    ServiceResponse::new(registry_view(&state.session()))
}

/// `POST /api/v1/waypoints`
pub async fn add_waypoint(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(request): Json<AddWaypointRequest>,
) -> ApiResult<Response> {
    let rid = request_id.as_str();
    request.validate(rid).map_err(|problem| *problem)?;
    let Some(input) = request.input() else {
        return Err(ProblemDetails::bad_request(
            "Provide a 'link' or both 'lat' and 'lng'",
            rid,
        ));
    };

    let name = request.name.as_deref();
    let added = {
        let mut session = state.session();
        match input {
            WaypointInput::Link(text) => session.add_waypoint_from_link(name, text),
            WaypointInput::Coordinates(point) => session.add_waypoint(name, point.lat, point.lng),
        }
    };
    let waypoint = added.map_err(|e| {
        warn!(request_id = %rid, error = %e, "waypoint rejected");
        from_lib_error(&e, rid)
    })?;

    record_waypoint_event("added");
    info!(request_id = %rid, id = %waypoint.id, name = %waypoint.name, "waypoint added");
    Ok((StatusCode::CREATED, ServiceResponse::new(waypoint)).into_response())
}

/// `DELETE /api/v1/waypoints/{id}`
pub async fn remove_waypoint(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    let rid = request_id.as_str();
    state
        .session()
        .remove_waypoint(WaypointId(id))
        .map_err(|e| from_lib_error(&e, rid))?;

    record_waypoint_event("removed");
    info!(request_id = %rid, id, "waypoint removed");
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/v1/waypoints`
pub async fn clear_waypoints(
    State(state): State<AppState>,
    request_id: RequestId,
) -> ServiceResponse<ClearedView> {
    let removed = state.session().clear_waypoints();
    if removed > 0 {
        record_waypoint_event("cleared");
    }
    info!(request_id = %request_id, removed, "waypoints cleared");
    ServiceResponse::new(ClearedView { removed })
}

/// `PUT /api/v1/base`
pub async fn update_base(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(request): Json<UpdateBaseRequest>,
) -> ApiResult<ServiceResponse<RegistryView>> {
    let rid = request_id.as_str();
    request.validate(rid).map_err(|problem| *problem)?;

    let mut session = state.session();
    session
        .update_base(request.location(), request.name.as_deref())
        .map_err(|e| from_lib_error(&e, rid))?;
    record_waypoint_event("base_updated");
    info!(request_id = %rid, base = %session.base().name, "base updated");
    Ok(ServiceResponse::new(registry_view(&session)))
}

/// `POST /api/v1/extract`
pub async fn extract_coordinates(
    request_id: RequestId,
    Json(request): Json<ExtractRequest>,
) -> ApiResult<ServiceResponse<LinkMatch>> {
    let rid = request_id.as_str();
    request.validate(rid).map_err(|problem| *problem)?;

    match extract(&request.text) {
        found @ LinkMatch::Matched { .. } => Ok(ServiceResponse::new(found)),
        LinkMatch::NoMatch => Err(from_lib_error(
            &rotafacil_lib::Error::CoordinatesNotFound {
                input: request.text.trim().to_string(),
            },
            rid,
        )),
    }
}

/// `GET /api/v1/route`
pub async fn current_route(
    State(state): State<AppState>,
    request_id: RequestId,
) -> ApiResult<ServiceResponse<RouteView>> {
    route_view(&state.session())
        .map(ServiceResponse::new)
        .ok_or_else(|| ProblemDetails::route_not_found(request_id.as_str()))
}

/// `POST /api/v1/route`
///
/// The session lock is released while the routing backend is queried. The
/// computation runs in its own task so that a client disconnect cannot leave
/// the in-flight guard claimed.
pub async fn compute_route(
    State(state): State<AppState>,
    request_id: RequestId,
) -> ApiResult<ServiceResponse<RouteView>> {
    let rid = request_id.as_str().to_string();

    let ticket = state.session().begin_route().map_err(|e| {
        record_route_failed(failure_reason(&e));
        from_lib_error(&e, &rid)
    })?;
    info!(
        request_id = %rid,
        stops = ticket.waypoints().len(),
        revision = ticket.revision(),
        "computing route"
    );

    let task_state = state.clone();
    let task = tokio::spawn(async move {
        let outcome = task_state
            .orchestrator()
            .compute_route(ticket.base(), ticket.waypoints())
            .await;
        let mut session = task_state.session();
        let applied = session.finish_route(ticket, outcome);
        applied.map(|result| (result, route_view(&session)))
    });

    let (result, view) = match task.await {
        Ok(Ok(done)) => done,
        Ok(Err(e)) => {
            warn!(request_id = %rid, error = %e, "route computation failed");
            record_route_failed(failure_reason(&e));
            return Err(from_lib_error(&e, &rid));
        }
        Err(join_error) => {
            error!(request_id = %rid, error = %join_error, "route task aborted");
            state.session().abandon_route();
            record_route_failed("internal_error");
            return Err(ProblemDetails::internal_error(
                "route computation aborted",
                rid,
            ));
        }
    };

    let strategy = result.strategy.to_string();
    record_route_computed(&strategy);
    record_route_stops(result.stop_count(), &strategy);
    info!(
        request_id = %rid,
        strategy = %strategy,
        stops = result.stop_count(),
        distance_m = result.total_distance_meters,
        "route computed successfully"
    );

    view.map(ServiceResponse::new).ok_or_else(|| {
        ProblemDetails::internal_error("route applied but not available", rid)
    })
}
