//! Incident entity
//!
//! An Incident is a ticket reported against a channel. It owns its lifecycle
//! state and knows which actions are currently permitted on it.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::audit::CreatedUpdated;
use crate::error::{DomainError, Result};
use crate::hypermedia::Actionable;
use crate::incident::ids::IncidentId;
use crate::incident::state::{Action, State};
use crate::refs::{ExternalUserId, TimelogId, Timestamp};

/// An incident ticket
///
/// The identity is assigned exactly once, either by the service right after
/// generating it or by a repository materializing a stored record. State is
/// changed through [`Incident::apply_action`]; [`Incident::set_state`] exists
/// only for reconstruction from storage.
///
/// The audit trail is only reachable through stamping methods, so the created
/// pair cannot be reset once written. The revision is the storage version the
/// incident was loaded at and guards updates against concurrent writers.
///
/// # Example
///
/// ```rust
/// use itsm_domain::incident::{Action, Incident, State};
///
/// let mut incident = Incident::new("ABC123", "disk full");
/// assert_eq!(incident.state(), State::New);
///
/// incident.apply_action(Action::StartWorking).unwrap();
/// assert_eq!(incident.state(), State::InProgress);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Incident {
    id: Option<IncidentId>,

    /// Caller-supplied label, unique within a channel
    pub number: String,

    /// Correlation ID in an external system
    pub external_id: Option<String>,

    pub short_description: String,

    pub description: Option<String>,

    state: State,

    timelogs: Vec<TimelogId>,

    created_updated: CreatedUpdated,

    #[serde(skip)]
    revision: u64,
}

impl Incident {
    /// Create an unidentified incident in the `New` state
    pub fn new(number: impl Into<String>, short_description: impl Into<String>) -> Self {
        Self {
            id: None,
            number: number.into(),
            external_id: None,
            short_description: short_description.into(),
            description: None,
            state: State::New,
            timelogs: Vec::new(),
            created_updated: CreatedUpdated::default(),
            revision: 0,
        }
    }

    pub fn with_external_id(mut self, external_id: Option<String>) -> Self {
        self.external_id = external_id;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Get the incident's identifier, if assigned
    pub fn id(&self) -> Option<IncidentId> {
        self.id
    }

    /// Assign the identifier
    ///
    /// Fails if the id is nil or a different id has already been assigned.
    pub fn set_id(&mut self, id: IncidentId) -> Result<()> {
        if id.is_nil() {
            return Err(DomainError::validation("incident ID must not be nil"));
        }
        match self.id {
            Some(current) if current != id => Err(DomainError::validation(format!(
                "incident ID is already set to {}",
                current
            ))),
            _ => {
                self.id = Some(id);
                Ok(())
            }
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Overwrite the state when reconstituting from storage
    pub fn set_state(&mut self, state: State) {
        self.state = state;
    }

    /// Apply a state-gated action and return the resulting state
    pub fn apply_action(&mut self, action: Action) -> Result<State> {
        let next = self
            .state
            .transition(action)
            .ok_or_else(|| DomainError::illegal_transition(action, self.state))?;
        self.state = next;
        Ok(next)
    }

    /// Actions currently permitted, a pure function of the state
    pub fn allowed_actions(&self) -> BTreeSet<Action> {
        self.state.allowed_actions()
    }

    /// Related timelogs, in order
    pub fn timelogs(&self) -> &[TimelogId] {
        &self.timelogs
    }

    /// Replace the timelog references when reconstituting from storage
    pub fn set_timelogs(&mut self, timelogs: Vec<TimelogId>) {
        self.timelogs = timelogs;
    }

    /// Audit trail
    pub fn created_updated(&self) -> &CreatedUpdated {
        &self.created_updated
    }

    /// Stamp the audit trail of a newly created incident
    pub fn stamp_created(&mut self, actor: &ExternalUserId, at: Timestamp) -> Result<()> {
        self.created_updated.stamp_created(actor, at)
    }

    /// Stamp the updated pair for a mutation
    pub fn stamp_updated(&mut self, actor: &ExternalUserId, at: Timestamp) -> Result<()> {
        self.created_updated.stamp_updated(actor, at)
    }

    /// Restore a stored audit trail
    ///
    /// Fails if the created pair is already set, like the audit setters themselves.
    pub fn restore_audit(
        &mut self,
        created_by: &ExternalUserId,
        created_at: Timestamp,
        updated_by: &ExternalUserId,
        updated_at: Timestamp,
    ) -> Result<()> {
        let audit = &mut self.created_updated;
        audit.set_created_by(created_by)?;
        audit.set_created_at(created_at)?;
        audit.set_updated_by(updated_by)?;
        audit.set_updated_at(updated_at)
    }

    /// Storage revision this incident was loaded at; 0 until first persisted
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Record the storage revision when reconstituting from storage
    pub fn set_revision(&mut self, revision: u64) {
        self.revision = revision;
    }
}

impl Actionable for Incident {
    type Action = Action;

    fn allowed_actions(&self) -> BTreeSet<Action> {
        Incident::allowed_actions(self)
    }

    fn resource_id(&self) -> Option<String> {
        self.id.map(|id| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incident_creation() {
        let incident = Incident::new("ABC123", "disk full")
            .with_external_id(Some("EXT-1".to_string()))
            .with_description(None);

        assert!(incident.id().is_none());
        assert_eq!(incident.number, "ABC123");
        assert_eq!(incident.short_description, "disk full");
        assert_eq!(incident.external_id.as_deref(), Some("EXT-1"));
        assert_eq!(incident.state(), State::New);
        assert!(incident.timelogs().is_empty());
        assert!(!incident.created_updated().is_complete());
        assert_eq!(incident.revision(), 0);
    }

    #[test]
    fn test_set_id_is_write_once() {
        let mut incident = Incident::new("ABC123", "disk full");
        let id = IncidentId::new();

        incident.set_id(id).unwrap();
        // re-confirming the same id is fine
        incident.set_id(id).unwrap();

        let err = incident.set_id(IncidentId::new()).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(incident.id(), Some(id));
    }

    #[test]
    fn test_set_id_rejects_nil() {
        let mut incident = Incident::new("ABC123", "disk full");
        assert!(incident.set_id(IncidentId::from_uuid(uuid::Uuid::nil())).is_err());
    }

    #[test]
    fn test_apply_action_follows_table() {
        let mut incident = Incident::new("ABC123", "disk full");

        assert_eq!(
            incident.apply_action(Action::StartWorking).unwrap(),
            State::InProgress
        );
        assert_eq!(incident.allowed_actions(), BTreeSet::from([Action::Cancel]));

        let err = incident.apply_action(Action::StartWorking).unwrap_err();
        assert!(matches!(err, DomainError::IllegalTransition { .. }));
        assert_eq!(incident.state(), State::InProgress);

        assert_eq!(
            incident.apply_action(Action::Cancel).unwrap(),
            State::Cancelled
        );
        assert!(incident.allowed_actions().is_empty());
        assert!(incident.apply_action(Action::Cancel).is_err());
    }

    #[test]
    fn test_audit_cannot_be_restamped() {
        let creator = ExternalUserId::new("creator");
        let at = Timestamp::parse("2024-03-01T10:00:00Z").unwrap();
        let mut incident = Incident::new("ABC123", "disk full");
        incident.stamp_created(&creator, at).unwrap();

        assert!(incident
            .stamp_created(&ExternalUserId::new("intruder"), at)
            .is_err());
        assert!(incident
            .restore_audit(&ExternalUserId::new("intruder"), at, &creator, at)
            .is_err());
        assert_eq!(incident.created_updated().created_by(), Some(&creator));
    }

    #[test]
    fn test_set_state_accepts_any_state() {
        let mut incident = Incident::new("ABC123", "disk full");
        incident.set_state(State::Cancelled);
        assert_eq!(incident.state(), State::Cancelled);
    }
}
