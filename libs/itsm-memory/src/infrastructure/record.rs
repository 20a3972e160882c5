//! Storage-shaped incident record
//!
//! Fields are kept as plain strings, the way a networked store would hand them
//! back, and entities are rebuilt through their validating setters.

use itsm_domain::{
    incident::State, DomainError, ExternalUserId, Incident, IncidentId, Result, TimelogId,
    Timestamp,
};

#[derive(Debug, Clone)]
pub(crate) struct StoredIncident {
    pub id: String,
    pub number: String,
    pub external_id: Option<String>,
    pub short_description: String,
    pub description: Option<String>,
    pub state: String,
    pub timelogs: Vec<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_by: String,
    pub updated_at: String,
    pub revision: u64,
}

impl StoredIncident {
    /// Flatten an incident; fails if it has no id or an incomplete audit trail
    pub fn from_incident(id: IncidentId, incident: &Incident) -> Result<Self> {
        let audit = incident.created_updated();
        let (Some(created_by), Some(created_at), Some(updated_by), Some(updated_at)) = (
            audit.created_by(),
            audit.created_at(),
            audit.updated_by(),
            audit.updated_at(),
        ) else {
            return Err(DomainError::internal(format!(
                "incident {} has an incomplete audit trail",
                id
            )));
        };

        Ok(Self {
            id: id.to_string(),
            number: incident.number.clone(),
            external_id: incident.external_id.clone(),
            short_description: incident.short_description.clone(),
            description: incident.description.clone(),
            state: incident.state().to_string(),
            timelogs: incident.timelogs().iter().map(ToString::to_string).collect(),
            created_by: created_by.to_string(),
            created_at: created_at.to_string(),
            updated_by: updated_by.to_string(),
            updated_at: updated_at.to_string(),
            revision: incident.revision(),
        })
    }

    /// Overwrite everything except identity, number and the created pair, and
    /// bump the revision
    pub fn apply_update(&mut self, update: StoredIncident) {
        self.external_id = update.external_id;
        self.short_description = update.short_description;
        self.description = update.description;
        self.state = update.state;
        self.timelogs = update.timelogs;
        self.updated_by = update.updated_by;
        self.updated_at = update.updated_at;
        self.revision += 1;
    }

    /// Rebuild the domain entity
    pub fn to_incident(&self) -> Result<Incident> {
        self.materialize().map_err(|err| {
            DomainError::internal(format!(
                "error loading incident {} from the repository: {}",
                self.id, err
            ))
        })
    }

    fn materialize(&self) -> Result<Incident> {
        let mut incident = Incident::new(self.number.clone(), self.short_description.clone())
            .with_external_id(self.external_id.clone())
            .with_description(self.description.clone());

        incident.set_id(self.id.parse()?)?;
        incident.set_state(self.state.parse::<State>()?);
        incident.set_timelogs(
            self.timelogs
                .iter()
                .map(|t| t.parse::<TimelogId>())
                .collect::<Result<Vec<_>>>()?,
        );

        incident.restore_audit(
            &ExternalUserId::new(self.created_by.clone()),
            Timestamp::parse(&self.created_at)?,
            &ExternalUserId::new(self.updated_by.clone()),
            Timestamp::parse(&self.updated_at)?,
        )?;
        incident.set_revision(self.revision);

        Ok(incident)
    }
}
