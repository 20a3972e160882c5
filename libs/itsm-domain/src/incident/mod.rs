//! Incident domain module
//!
//! This module contains the Incident entity, its lifecycle state machine and the
//! service orchestrating creation, retrieval, listing and transitions.

mod entity;
mod ids;
mod params;
mod ports;
mod service;
mod state;

pub use entity::Incident;
pub use ids::IncidentId;
pub use params::{CreateIncidentParams, UpdateIncidentParams};
pub use ports::IncidentServicePort;
pub use service::IncidentService;
pub use state::{Action, State};
