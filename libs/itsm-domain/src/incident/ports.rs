//! Port trait for the Incident Service
//!
//! The HTTP layer depends on this trait rather than on the concrete
//! `IncidentService`, so handlers can be driven by any implementation.
//!
//! Every call takes the channel and the acting user explicitly; nothing is
//! looked up from ambient request state.

use std::future::Future;

use crate::error::DomainError;
use crate::incident::{
    Action, CreateIncidentParams, Incident, IncidentId, UpdateIncidentParams,
};
use crate::pagination::Page;
use crate::refs::{ChannelId, ExternalUserId};

/// Port trait for incident operations
pub trait IncidentServicePort: Send + Sync {
    /// Create a new incident and return its identifier
    ///
    /// # Errors
    ///
    /// - `DomainError::Validation` if number or short description is blank
    /// - `DomainError::Conflict` if the number already exists in the channel
    /// - `DomainError::Internal` on identifier generation, clock or storage failure
    fn create_incident(
        &self,
        channel_id: &ChannelId,
        actor: &ExternalUserId,
        params: CreateIncidentParams,
    ) -> impl Future<Output = Result<IncidentId, DomainError>> + Send;

    /// Fetch a single incident
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if absent or owned by another channel
    fn get_incident(
        &self,
        channel_id: &ChannelId,
        actor: &ExternalUserId,
        id: &IncidentId,
    ) -> impl Future<Output = Result<Incident, DomainError>> + Send;

    /// List one page of incidents in insertion order
    ///
    /// `page` is 1-indexed. A page past the end is empty, not an error.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `page` or `per_page` is below 1
    fn list_incidents(
        &self,
        channel_id: &ChannelId,
        actor: &ExternalUserId,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = Result<Page<Incident>, DomainError>> + Send;

    /// Overwrite the descriptive fields of an incident
    fn update_incident(
        &self,
        channel_id: &ChannelId,
        actor: &ExternalUserId,
        id: &IncidentId,
        params: UpdateIncidentParams,
    ) -> impl Future<Output = Result<Incident, DomainError>> + Send;

    /// Apply a state-gated action to an incident
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IllegalTransition` if the action is not allowed
    /// in the incident's current state
    fn apply_incident_action(
        &self,
        channel_id: &ChannelId,
        actor: &ExternalUserId,
        id: &IncidentId,
        action: Action,
    ) -> impl Future<Output = Result<Incident, DomainError>> + Send;
}
