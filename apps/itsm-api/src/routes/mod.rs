//! API routes

pub mod incidents;

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    dto::incidents::{
        CreateIncidentRequest, ErrorResponse, IncidentCreatedResponse, IncidentListResponse,
        IncidentResponse, LinkResponse, UpdateIncidentRequest,
    },
    handlers, AppState,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::incidents::create_incident,
        handlers::incidents::get_incident,
        handlers::incidents::list_incidents,
        handlers::incidents::update_incident,
        handlers::incidents::cancel_incident,
        handlers::incidents::start_working,
        health_handler
    ),
    components(
        schemas(
            CreateIncidentRequest,
            UpdateIncidentRequest,
            IncidentResponse,
            IncidentListResponse,
            IncidentCreatedResponse,
            LinkResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "incidents", description = "Incident ticket endpoints"),
        (name = "health", description = "Health check endpoints")
    ),
    info(
        title = "ITSM Ticket Management API",
        version = "0.1.0",
        description = "Incident tickets scoped to communication channels, with hypermedia action links"
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(incidents::routes())
        .route("/health", axum::routing::get(health_handler))
        .with_state(state)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    ),
    tag = "health"
)]
async fn health_handler() -> &'static str {
    "OK"
}
