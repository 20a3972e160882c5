//! DTOs for incident endpoints

use std::collections::BTreeMap;

use itsm_domain::{
    hypermedia::{HypermediaLinks, Link},
    incident::{CreateIncidentParams, UpdateIncidentParams},
    Incident, Page,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Request body for creating an incident
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateIncidentRequest {
    /// Unique identifier provided by the user creating the incident
    #[schema(example = "ABC123")]
    pub number: String,
    /// ID in an external system
    #[serde(default)]
    pub external_id: Option<String>,
    #[schema(example = "disk full")]
    pub short_description: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<CreateIncidentRequest> for CreateIncidentParams {
    fn from(req: CreateIncidentRequest) -> Self {
        Self {
            number: req.number,
            external_id: req.external_id,
            short_description: req.short_description,
            description: req.description,
        }
    }
}

/// Request body for updating an incident
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateIncidentRequest {
    pub short_description: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<UpdateIncidentRequest> for UpdateIncidentParams {
    fn from(req: UpdateIncidentRequest) -> Self {
        Self {
            short_description: req.short_description,
            description: req.description,
        }
    }
}

/// Query parameters for listing incidents
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListIncidentsQuery {
    /// 1-indexed page number, defaults to 1
    pub page: Option<String>,
}

/// A navigable link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LinkResponse {
    #[schema(example = "http://localhost:8080/incidents/2af4f493-0bd5-4513-b440-6cbb465feadb/cancel")]
    pub href: String,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self { href: link.href }
    }
}

fn links_response(links: HypermediaLinks) -> BTreeMap<String, LinkResponse> {
    links.into_iter().map(|(name, link)| (name, link.into())).collect()
}

/// Response body for a single incident
#[derive(Debug, Serialize, ToSchema)]
pub struct IncidentResponse {
    #[schema(example = "2af4f493-0bd5-4513-b440-6cbb465feadb")]
    pub uuid: String,
    pub number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub short_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// State of the ticket
    #[schema(example = "new")]
    pub state: String,
    /// Related timelogs, read only
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub timelogs: Vec<String>,
    pub created_by: String,
    #[schema(example = "2024-03-01T10:00:00Z")]
    pub created_at: String,
    pub updated_by: String,
    #[schema(example = "2024-03-01T10:00:00Z")]
    pub updated_at: String,
    /// Self link plus one link per currently allowed action
    #[serde(rename = "_links")]
    pub links: BTreeMap<String, LinkResponse>,
    #[serde(rename = "_embedded", skip_serializing_if = "BTreeMap::is_empty")]
    #[schema(value_type = Object)]
    pub embedded: BTreeMap<String, serde_json::Value>,
}

impl IncidentResponse {
    /// Render an incident with its self link and action links
    pub fn new(incident: &Incident, self_href: String, action_links: HypermediaLinks) -> Self {
        let audit = incident.created_updated();
        let mut links = links_response(action_links);
        links.insert("self".to_string(), LinkResponse { href: self_href });

        Self {
            uuid: incident.id().map(|id| id.to_string()).unwrap_or_default(),
            number: incident.number.clone(),
            external_id: incident.external_id.clone(),
            short_description: incident.short_description.clone(),
            description: incident.description.clone(),
            state: incident.state().to_string(),
            timelogs: incident.timelogs().iter().map(ToString::to_string).collect(),
            created_by: audit.created_by().map(ToString::to_string).unwrap_or_default(),
            created_at: audit.created_at().map(|t| t.to_string()).unwrap_or_default(),
            updated_by: audit.updated_by().map(ToString::to_string).unwrap_or_default(),
            updated_at: audit.updated_at().map(|t| t.to_string()).unwrap_or_default(),
            links,
            embedded: BTreeMap::new(),
        }
    }
}

/// Response body for a page of incidents
#[derive(Debug, Serialize, ToSchema)]
pub struct IncidentListResponse {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
    #[serde(rename = "_embedded")]
    pub result: Vec<IncidentResponse>,
    /// Navigation links: self, first, last, and prev/next when they exist
    #[serde(rename = "_links")]
    pub links: BTreeMap<String, LinkResponse>,
}

impl IncidentListResponse {
    /// Render a page; `list_href` is the absolute URI of the collection
    pub fn new<T>(page: &Page<T>, result: Vec<IncidentResponse>, list_href: &str) -> Self {
        let page_href = |n: u32| LinkResponse {
            href: format!("{}?page={}", list_href, n),
        };
        let total_pages = page.total_pages();

        let mut links = BTreeMap::new();
        links.insert("self".to_string(), page_href(page.page));
        links.insert("first".to_string(), page_href(1));
        links.insert("last".to_string(), page_href(total_pages));
        if page.has_prev() {
            links.insert("prev".to_string(), page_href(page.page - 1));
        }
        if page.has_next() {
            links.insert("next".to_string(), page_href(page.page + 1));
        }

        Self {
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            total_pages,
            result,
            links,
        }
    }
}

/// Response body for a created incident
#[derive(Debug, Serialize, ToSchema)]
pub struct IncidentCreatedResponse {
    #[schema(example = "2af4f493-0bd5-4513-b440-6cbb465feadb")]
    pub uuid: String,
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error description
    #[schema(example = "'number' is required")]
    pub error: String,
}
