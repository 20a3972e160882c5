//! Incident routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers::incidents::{
        cancel_incident, create_incident, get_incident, list_incidents, start_working,
        update_incident,
    },
    AppState,
};

/// Create incident routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/incidents", post(create_incident).get(list_incidents))
        .route("/incidents/:id", get(get_incident).patch(update_incident))
        .route("/incidents/:id/cancel", post(cancel_incident))
        .route("/incidents/:id/start_working", post(start_working))
}
