//! Audit trail value object embedded by every ticket entity

use serde::Serialize;

use crate::error::{DomainError, Result};
use crate::refs::{ExternalUserId, Timestamp};

/// Who created and last updated a ticket, and when
///
/// The created pair is written once and never changes afterwards. The updated
/// pair is written at creation and overwritten on every later mutation, and
/// `updated_at` may never precede `created_at`.
///
/// A freshly constructed value has every field unset; it only becomes a valid
/// part of an entity once [`CreatedUpdated::is_complete`] holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreatedUpdated {
    created_by: Option<ExternalUserId>,
    created_at: Option<Timestamp>,
    updated_by: Option<ExternalUserId>,
    updated_at: Option<Timestamp>,
}

impl CreatedUpdated {
    /// Stamp all four fields for a newly created entity
    pub fn stamp_created(&mut self, actor: &ExternalUserId, at: Timestamp) -> Result<()> {
        self.set_created_by(actor)?;
        self.set_created_at(at)?;
        self.stamp_updated(actor, at)
    }

    /// Stamp the updated pair for a mutation
    pub fn stamp_updated(&mut self, actor: &ExternalUserId, at: Timestamp) -> Result<()> {
        self.set_updated_by(actor)?;
        self.set_updated_at(at)
    }

    /// Set the creating actor; fails if blank or already set
    pub fn set_created_by(&mut self, actor: &ExternalUserId) -> Result<()> {
        validate_actor(actor)?;
        if self.created_by.is_some() {
            return Err(DomainError::validation("created_by is already set"));
        }
        self.created_by = Some(actor.clone());
        Ok(())
    }

    /// Set the creation instant; fails if already set or later than `updated_at`
    pub fn set_created_at(&mut self, at: Timestamp) -> Result<()> {
        if self.created_at.is_some() {
            return Err(DomainError::validation("created_at is already set"));
        }
        if let Some(updated_at) = self.updated_at {
            if updated_at < at {
                return Err(DomainError::validation(format!(
                    "created_at {} is later than updated_at {}",
                    at, updated_at
                )));
            }
        }
        self.created_at = Some(at);
        Ok(())
    }

    /// Set the last updating actor; fails if blank
    pub fn set_updated_by(&mut self, actor: &ExternalUserId) -> Result<()> {
        validate_actor(actor)?;
        self.updated_by = Some(actor.clone());
        Ok(())
    }

    /// Set the last update instant; fails if earlier than `created_at`
    pub fn set_updated_at(&mut self, at: Timestamp) -> Result<()> {
        if let Some(created_at) = self.created_at {
            if at < created_at {
                return Err(DomainError::validation(format!(
                    "updated_at {} is earlier than created_at {}",
                    at, created_at
                )));
            }
        }
        self.updated_at = Some(at);
        Ok(())
    }

    pub fn created_by(&self) -> Option<&ExternalUserId> {
        self.created_by.as_ref()
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }

    pub fn updated_by(&self) -> Option<&ExternalUserId> {
        self.updated_by.as_ref()
    }

    pub fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }

    /// Whether every field has been set
    pub fn is_complete(&self) -> bool {
        self.created_by.is_some()
            && self.created_at.is_some()
            && self.updated_by.is_some()
            && self.updated_at.is_some()
    }
}

fn validate_actor(actor: &ExternalUserId) -> Result<()> {
    if actor.is_blank() {
        return Err(DomainError::validation("actor ID must not be empty"));
    }
    Ok(())
}
