//! Incident service - Business logic orchestration
//!
//! The service coordinates between the Incident entity, the repository port and
//! the clock / identifier ports. It owns the lifecycle of the incidents it creates:
//! identity, initial state and audit stamps are assigned here and nowhere else.

use super::{
    Action, CreateIncidentParams, Incident, IncidentId, IncidentServicePort,
    UpdateIncidentParams,
};
use crate::error::{DomainError, Result};
use crate::pagination::{Page, PageRequest};
use crate::ports::{Clock, IdGenerator, IncidentRepository, SystemClock, UuidV7Generator};
use crate::refs::{ChannelId, ExternalUserId};

/// Service for managing incidents
///
/// Generic over the repository, the clock and the identifier source; the
/// compiler generates a specialized version for each combination.
///
/// Repository errors are passed through unchanged, so their kind survives to
/// the presentation layer.
pub struct IncidentService<R, C = SystemClock, G = UuidV7Generator> {
    repository: R,
    clock: C,
    ids: G,
}

impl<R> IncidentService<R>
where
    R: IncidentRepository,
{
    /// Create a new IncidentService using the system clock and UUID v7 identifiers
    pub fn with_repository(repository: R) -> Self {
        Self::new(repository, SystemClock, UuidV7Generator)
    }
}

impl<R, C, G> IncidentService<R, C, G>
where
    R: IncidentRepository,
    C: Clock,
    G: IdGenerator,
{
    pub fn new(repository: R, clock: C, ids: G) -> Self {
        Self {
            repository,
            clock,
            ids,
        }
    }

    /// Get the underlying repository
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Load an incident, mutate it and persist it with a fresh updated stamp
    ///
    /// The write is conditional on the revision that was loaded, so of two
    /// concurrent mutations starting from the same snapshot only one lands; the
    /// other fails with `Conflict`.
    async fn mutate_incident<F>(
        &self,
        channel_id: &ChannelId,
        actor: &ExternalUserId,
        id: &IncidentId,
        mutate: F,
    ) -> Result<Incident>
    where
        F: FnOnce(&mut Incident) -> Result<()> + Send,
    {
        let mut incident = self.repository.get_incident(channel_id, id).await?;

        mutate(&mut incident)?;

        let now = self.clock.now()?;
        if let Some(created_at) = incident.created_updated().created_at() {
            if now < created_at {
                return Err(DomainError::internal(format!(
                    "clock reads {} before incident {} was created at {}",
                    now, id, created_at
                )));
            }
        }
        incident.stamp_updated(actor, now)?;

        let revision = self
            .repository
            .update_incident(channel_id, &incident)
            .await?;
        incident.set_revision(revision);

        Ok(incident)
    }
}

impl<R, C, G> IncidentServicePort for IncidentService<R, C, G>
where
    R: IncidentRepository,
    C: Clock,
    G: IdGenerator,
{
    async fn create_incident(
        &self,
        channel_id: &ChannelId,
        actor: &ExternalUserId,
        params: CreateIncidentParams,
    ) -> Result<IncidentId> {
        params.validate()?;

        let id = self.ids.generate()?;
        let now = self.clock.now()?;

        let mut incident = Incident::new(params.number, params.short_description)
            .with_external_id(non_blank(params.external_id))
            .with_description(non_blank(params.description));

        incident.set_id(id).map_err(|err| {
            DomainError::internal(format!("generated identifier was rejected: {}", err))
        })?;
        incident.stamp_created(actor, now)?;

        self.repository.add_incident(channel_id, &incident).await
    }

    async fn get_incident(
        &self,
        channel_id: &ChannelId,
        _actor: &ExternalUserId,
        id: &IncidentId,
    ) -> Result<Incident> {
        self.repository.get_incident(channel_id, id).await
    }

    async fn list_incidents(
        &self,
        channel_id: &ChannelId,
        _actor: &ExternalUserId,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Incident>> {
        let request = PageRequest::new(page, per_page)?;
        self.repository.list_incidents(channel_id, request).await
    }

    async fn update_incident(
        &self,
        channel_id: &ChannelId,
        actor: &ExternalUserId,
        id: &IncidentId,
        params: UpdateIncidentParams,
    ) -> Result<Incident> {
        params.validate()?;

        self.mutate_incident(channel_id, actor, id, move |incident| {
            incident.short_description = params.short_description;
            incident.description = non_blank(params.description);
            Ok(())
        })
        .await
    }

    async fn apply_incident_action(
        &self,
        channel_id: &ChannelId,
        actor: &ExternalUserId,
        id: &IncidentId,
        action: Action,
    ) -> Result<Incident> {
        self.mutate_incident(channel_id, actor, id, move |incident| {
            incident.apply_action(action).map(|_| ())
        })
        .await
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
