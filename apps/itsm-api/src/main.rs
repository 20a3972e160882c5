//! ITSM API - Incident Ticket Service
//!
//! HTTP service for creating, listing and driving incident tickets through
//! their lifecycle. Every request is scoped to a channel (tenant) and carries
//! the acting user; responses advertise the actions allowed in the current
//! state as hypermedia links.

mod config;
mod dto;
mod error;
mod extractors;
mod handlers;
mod hypermedia;
mod routes;

use anyhow::{Context, Result};
use itsm_domain::{hypermedia::ActionLinkRegistry, incident::Action, IncidentService};
use itsm_memory::infrastructure::InMemoryIncidentRepository;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LogFormat};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub incident_service: Arc<IncidentService<InMemoryIncidentRepository>>,
    pub links: Arc<ActionLinkRegistry<Action>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, repository: InMemoryIncidentRepository) -> Self {
        Self {
            incident_service: Arc::new(IncidentService::with_repository(repository)),
            links: Arc::new(hypermedia::incident_action_links(&config.external_address)),
            config: Arc::new(config),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;

    init_tracing(config.log_format);

    info!(
        external_address = %config.external_address,
        per_page = config.per_page,
        "Starting ITSM incident service"
    );

    let state = AppState::new(config.clone(), InMemoryIncidentRepository::new());

    // Build HTTP router
    let app = routes::create_router(state);

    let addr = config.bind_addr();
    info!(addr = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
