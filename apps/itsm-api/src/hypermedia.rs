//! Incident routes exposed as hypermedia action links

use itsm_domain::{hypermedia::ActionLinkRegistry, incident::Action, IncidentId};

pub const LIST_INCIDENTS_ROUTE: &str = "/incidents";

const CANCEL_INCIDENT_ROUTE: &str = "/incidents/{uuid}/cancel";
const INCIDENT_START_WORKING_ROUTE: &str = "/incidents/{uuid}/start_working";

/// Action link registry for incident resources under `server_addr`
pub fn incident_action_links(server_addr: &str) -> ActionLinkRegistry<Action> {
    ActionLinkRegistry::new(server_addr)
        .register(Action::Cancel, "CancelIncident", CANCEL_INCIDENT_ROUTE)
        .register(
            Action::StartWorking,
            "IncidentStartWorking",
            INCIDENT_START_WORKING_ROUTE,
        )
}

/// Absolute URI of a single incident
pub fn incident_href(server_addr: &str, id: &IncidentId) -> String {
    format!("{}{}/{}", server_addr, LIST_INCIDENTS_ROUTE, id)
}

/// Absolute URI of the incident collection
pub fn incidents_href(server_addr: &str) -> String {
    format!("{}{}", server_addr, LIST_INCIDENTS_ROUTE)
}
