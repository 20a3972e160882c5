//! Ports (trait definitions) for external dependencies
//!
//! Following hexagonal architecture, the domain defines what it needs, and the
//! infrastructure provides implementations.
//!
//! ## Static Dispatch
//!
//! Repository methods use native `impl Future` return types instead of
//! `async_trait`, so every implementation is monomorphized without boxing.
//!
//! ## Cancellation
//!
//! Dropping a returned future cancels the call. Implementations that perform I/O
//! must not leave a half-applied mutation behind when that happens.

use chrono::Utc;
use std::future::Future;

use crate::error::Result;
use crate::incident::{Incident, IncidentId};
use crate::pagination::{Page, PageRequest};
use crate::refs::{ChannelId, Timestamp};

/// Port for incident storage, scoped by channel
///
/// A deployment backs this with an indexed store keyed by `(channel, id)` and a
/// unique index on `(channel, number)`. Implementations only ever return
/// `NotFound`, `Conflict` or `Internal` errors.
pub trait IncidentRepository: Send + Sync {
    /// Persist a fully audited incident
    ///
    /// Assigns an identifier if the incident has none and confirms it is unused
    /// within the channel otherwise.
    ///
    /// # Errors
    ///
    /// - `DomainError::Conflict` if the id or the number already exists in the channel
    /// - `DomainError::Internal` if the audit trail is incomplete or storage fails
    fn add_incident(
        &self,
        channel_id: &ChannelId,
        incident: &Incident,
    ) -> impl Future<Output = Result<IncidentId>> + Send;

    /// Fetch an incident by id
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` unless a record matches both channel and id.
    /// A record in another channel is indistinguishable from a missing one.
    fn get_incident(
        &self,
        channel_id: &ChannelId,
        id: &IncidentId,
    ) -> impl Future<Output = Result<Incident>> + Send;

    /// List one page of the channel's incidents in insertion order
    fn list_incidents(
        &self,
        channel_id: &ChannelId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Incident>>> + Send;

    /// Replace the mutable fields of a stored incident and return its new revision
    ///
    /// The write only applies if the stored revision still equals
    /// `incident.revision()`, and bumps it by one. The stored number and created
    /// pair are kept.
    ///
    /// # Errors
    ///
    /// - `DomainError::NotFound` unless a record matches both channel and id
    /// - `DomainError::Conflict` if the record changed since the incident was loaded
    fn update_incident(
        &self,
        channel_id: &ChannelId,
        incident: &Incident,
    ) -> impl Future<Output = Result<u64>> + Send;
}

/// Source of the current time for audit stamps
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> Result<Timestamp>;
}

/// Source of fresh incident identifiers
#[cfg_attr(test, mockall::automock)]
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> Result<IncidentId>;
}

/// Wall clock in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<Timestamp> {
        Ok(Timestamp::from(Utc::now()))
    }
}

/// Time-ordered UUID v7 identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn generate(&self) -> Result<IncidentId> {
        Ok(IncidentId::new())
    }
}
