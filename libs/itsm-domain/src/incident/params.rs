//! Input payloads for incident operations

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

/// Payload used to create a new incident
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIncidentParams {
    /// Unique identifier within the channel
    pub number: String,
    pub external_id: Option<String>,
    pub short_description: String,
    pub description: Option<String>,
}

impl CreateIncidentParams {
    /// Number and short description are required and must not be blank
    pub fn validate(&self) -> Result<()> {
        require("number", &self.number)?;
        require("short_description", &self.short_description)
    }
}

/// Payload used to update an incident's descriptive fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateIncidentParams {
    pub short_description: String,
    pub description: Option<String>,
}

impl UpdateIncidentParams {
    pub fn validate(&self) -> Result<()> {
        require("short_description", &self.short_description)
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("'{}' is required", field)));
    }
    Ok(())
}
