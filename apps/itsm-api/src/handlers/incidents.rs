//! Incident handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};
use itsm_domain::{
    hypermedia::HypermediaMapper,
    incident::{Action, IncidentServicePort},
    Incident, IncidentId,
};
use tracing::{info, instrument, warn};

use super::within_deadline;
use crate::{
    dto::incidents::{
        CreateIncidentRequest, ErrorResponse, IncidentCreatedResponse, IncidentListResponse,
        IncidentResponse, ListIncidentsQuery, UpdateIncidentRequest,
    },
    error::ApiError,
    extractors::{Actor, Channel},
    hypermedia::{incident_href, incidents_href},
    AppState,
};

/// Create a new incident
#[utoipa::path(
    post,
    path = "/incidents",
    request_body = CreateIncidentRequest,
    params(
        ("X-Channel-ID" = String, Header, description = "Channel (tenant) ID"),
        ("X-User-ID" = String, Header, description = "Authenticated user ID")
    ),
    responses(
        (status = 201, description = "Incident created", body = IncidentCreatedResponse,
            headers(("Location" = String, description = "URI of the created incident"))),
        (status = 400, description = "Bad request - missing or invalid fields", body = ErrorResponse),
        (status = 401, description = "No authenticated user", body = ErrorResponse),
        (status = 403, description = "Missing or invalid channel", body = ErrorResponse),
        (status = 409, description = "Conflict - number already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "incidents"
)]
#[instrument(skip_all, fields(channel_id = %channel.0, actor = %actor.0))]
pub async fn create_incident(
    State(state): State<AppState>,
    channel: Channel,
    actor: Actor,
    payload: Result<Json<CreateIncidentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(error = %rejection, "Rejected create incident payload");
        ApiError::bad_request(rejection.body_text())
    })?;

    let id = within_deadline(
        state.config.request_timeout,
        state
            .incident_service
            .create_incident(&channel.0, &actor.0, payload.into()),
    )
    .await?;

    info!(incident_id = %id, "Created incident");

    let location = incident_href(state.links.server_addr(), &id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(IncidentCreatedResponse {
            uuid: id.to_string(),
        }),
    ))
}

/// Get a single incident
#[utoipa::path(
    get,
    path = "/incidents/{id}",
    params(
        ("id" = String, Path, description = "Incident UUID"),
        ("X-Channel-ID" = String, Header, description = "Channel (tenant) ID"),
        ("X-User-ID" = String, Header, description = "Authenticated user ID")
    ),
    responses(
        (status = 200, description = "The incident with its action links", body = IncidentResponse),
        (status = 400, description = "Malformed incident ID", body = ErrorResponse),
        (status = 401, description = "No authenticated user", body = ErrorResponse),
        (status = 403, description = "Missing or invalid channel", body = ErrorResponse),
        (status = 404, description = "Incident not found", body = ErrorResponse)
    ),
    tag = "incidents"
)]
#[instrument(skip_all, fields(channel_id = %channel.0, incident_id = %id))]
pub async fn get_incident(
    State(state): State<AppState>,
    channel: Channel,
    actor: Actor,
    Path(id): Path<String>,
) -> Result<Json<IncidentResponse>, ApiError> {
    let id = parse_id(&id)?;

    let incident = within_deadline(
        state.config.request_timeout,
        state.incident_service.get_incident(&channel.0, &actor.0, &id),
    )
    .await?;

    Ok(Json(render_incident(&state, &incident)))
}

/// List incidents page by page
#[utoipa::path(
    get,
    path = "/incidents",
    params(
        ListIncidentsQuery,
        ("X-Channel-ID" = String, Header, description = "Channel (tenant) ID"),
        ("X-User-ID" = String, Header, description = "Authenticated user ID")
    ),
    responses(
        (status = 200, description = "A page of incidents", body = IncidentListResponse),
        (status = 400, description = "Invalid page parameter", body = ErrorResponse),
        (status = 401, description = "No authenticated user", body = ErrorResponse),
        (status = 403, description = "Missing or invalid channel", body = ErrorResponse)
    ),
    tag = "incidents"
)]
#[instrument(skip_all, fields(channel_id = %channel.0))]
pub async fn list_incidents(
    State(state): State<AppState>,
    channel: Channel,
    actor: Actor,
    query: Result<Query<ListIncidentsQuery>, QueryRejection>,
) -> Result<Json<IncidentListResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        warn!(error = %rejection, "Rejected list incidents query");
        ApiError::bad_request(rejection.body_text())
    })?;
    let page = parse_page(query.page.as_deref())?;

    let list = within_deadline(
        state.config.request_timeout,
        state
            .incident_service
            .list_incidents(&channel.0, &actor.0, page, state.config.per_page),
    )
    .await?;

    let result = list
        .items
        .iter()
        .map(|incident| render_incident(&state, incident))
        .collect();

    Ok(Json(IncidentListResponse::new(
        &list,
        result,
        &incidents_href(state.links.server_addr()),
    )))
}

/// Update an incident's descriptive fields
#[utoipa::path(
    patch,
    path = "/incidents/{id}",
    request_body = UpdateIncidentRequest,
    params(
        ("id" = String, Path, description = "Incident UUID"),
        ("X-Channel-ID" = String, Header, description = "Channel (tenant) ID"),
        ("X-User-ID" = String, Header, description = "Authenticated user ID")
    ),
    responses(
        (status = 204, description = "Incident updated",
            headers(("Location" = String, description = "URI of the incident"))),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "No authenticated user", body = ErrorResponse),
        (status = 403, description = "Missing or invalid channel", body = ErrorResponse),
        (status = 404, description = "Incident not found", body = ErrorResponse),
        (status = 409, description = "Incident was modified concurrently", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "incidents"
)]
#[instrument(skip_all, fields(channel_id = %channel.0, incident_id = %id))]
pub async fn update_incident(
    State(state): State<AppState>,
    channel: Channel,
    actor: Actor,
    Path(id): Path<String>,
    payload: Result<Json<UpdateIncidentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let Json(payload) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    within_deadline(
        state.config.request_timeout,
        state
            .incident_service
            .update_incident(&channel.0, &actor.0, &id, payload.into()),
    )
    .await?;

    info!("Updated incident");
    Ok(no_content(&state, &id))
}

/// Cancel an incident
#[utoipa::path(
    post,
    path = "/incidents/{id}/cancel",
    params(
        ("id" = String, Path, description = "Incident UUID"),
        ("X-Channel-ID" = String, Header, description = "Channel (tenant) ID"),
        ("X-User-ID" = String, Header, description = "Authenticated user ID")
    ),
    responses(
        (status = 204, description = "Incident cancelled",
            headers(("Location" = String, description = "URI of the incident"))),
        (status = 400, description = "Action not allowed in the current state", body = ErrorResponse),
        (status = 401, description = "No authenticated user", body = ErrorResponse),
        (status = 403, description = "Missing or invalid channel", body = ErrorResponse),
        (status = 404, description = "Incident not found", body = ErrorResponse),
        (status = 409, description = "Incident was modified concurrently", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "incidents"
)]
pub async fn cancel_incident(
    state: State<AppState>,
    channel: Channel,
    actor: Actor,
    id: Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    apply_action(state, channel, actor, id, Action::Cancel).await
}

/// Start working on an incident
#[utoipa::path(
    post,
    path = "/incidents/{id}/start_working",
    params(
        ("id" = String, Path, description = "Incident UUID"),
        ("X-Channel-ID" = String, Header, description = "Channel (tenant) ID"),
        ("X-User-ID" = String, Header, description = "Authenticated user ID")
    ),
    responses(
        (status = 204, description = "Work on the incident started",
            headers(("Location" = String, description = "URI of the incident"))),
        (status = 400, description = "Action not allowed in the current state", body = ErrorResponse),
        (status = 401, description = "No authenticated user", body = ErrorResponse),
        (status = 403, description = "Missing or invalid channel", body = ErrorResponse),
        (status = 404, description = "Incident not found", body = ErrorResponse),
        (status = 409, description = "Incident was modified concurrently", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "incidents"
)]
pub async fn start_working(
    state: State<AppState>,
    channel: Channel,
    actor: Actor,
    id: Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    apply_action(state, channel, actor, id, Action::StartWorking).await
}

#[instrument(skip_all, fields(channel_id = %channel.0, incident_id = %id, action = %action))]
async fn apply_action(
    State(state): State<AppState>,
    channel: Channel,
    actor: Actor,
    Path(id): Path<String>,
    action: Action,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;

    let incident = within_deadline(
        state.config.request_timeout,
        state
            .incident_service
            .apply_incident_action(&channel.0, &actor.0, &id, action),
    )
    .await?;

    info!(state = %incident.state(), "Applied incident action");
    Ok(no_content(&state, &id))
}

fn render_incident(state: &AppState, incident: &Incident) -> IncidentResponse {
    let self_href = incident
        .id()
        .map(|id| incident_href(state.links.server_addr(), &id))
        .unwrap_or_default();
    IncidentResponse::new(incident, self_href, state.links.links_for(incident))
}

fn no_content(state: &AppState, id: &IncidentId) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(LOCATION, incident_href(state.links.server_addr(), id))],
    )
}

fn parse_id(raw: &str) -> Result<IncidentId, ApiError> {
    if raw.is_empty() {
        return Err(ApiError::bad_request("malformed URL: missing resource ID param"));
    }
    raw.parse::<IncidentId>().map_err(ApiError::from)
}

/// Parse the `page` query parameter; absent means the first page
fn parse_page(raw: Option<&str>) -> Result<u32, ApiError> {
    let raw = raw.unwrap_or("1");
    match raw.parse::<u32>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(ApiError::bad_request(format!(
            "incorrect 'page' parameter: '{}'",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(None).unwrap(), 1);
        assert_eq!(parse_page(Some("3")).unwrap(), 3);
        assert!(parse_page(Some("0")).is_err());
        assert!(parse_page(Some("-1")).is_err());
        assert!(parse_page(Some("two")).is_err());
    }

    #[test]
    fn test_parse_id() {
        assert!(parse_id("").is_err());
        assert!(parse_id("123").is_err());
        assert!(parse_id("2af4f493-0bd5-4513-b440-6cbb465feadb").is_ok());
    }
}
