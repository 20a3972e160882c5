//! Hypermedia action links
//!
//! Turns the actions an entity currently allows into navigable links, so that
//! clients discover legal next operations without embedding the state machine.
//! Route templates carry the [`ID_PLACEHOLDER`] where the resource identifier goes.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Placeholder substituted with the resource identifier in href templates
pub const ID_PLACEHOLDER: &str = "{uuid}";

/// A resource exposing state-gated actions
pub trait Actionable {
    type Action: Ord + Copy;

    /// Actions permitted in the current state
    fn allowed_actions(&self) -> BTreeSet<Self::Action>;

    /// Identifier substituted into href templates; `None` if not yet assigned
    fn resource_id(&self) -> Option<String>;
}

/// Display name and href template registered for an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLink {
    pub name: String,
    pub href: String,
}

/// A concrete, navigable link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// Link name to link
pub type HypermediaLinks = BTreeMap<String, Link>;

/// Maps domain actions to hypermedia links
pub trait HypermediaMapper<A: Ord + Copy> {
    /// Registered action links keyed by action
    fn action_links(&self) -> &BTreeMap<A, ActionLink>;

    /// Links for every action the resource currently allows
    ///
    /// Registered actions absent from the allowed set never appear, and allowed
    /// actions without a registration are skipped. A resource without an
    /// identifier yields no links.
    fn links_for<R>(&self, resource: &R) -> HypermediaLinks
    where
        R: Actionable<Action = A>,
    {
        let Some(id) = resource.resource_id() else {
            return HypermediaLinks::new();
        };

        let registry = self.action_links();
        resource
            .allowed_actions()
            .iter()
            .filter_map(|action| registry.get(action))
            .map(|link| {
                (
                    link.name.clone(),
                    Link::new(link.href.replace(ID_PLACEHOLDER, &id)),
                )
            })
            .collect()
    }
}

/// Registry of action routes under one server address
#[derive(Debug, Clone)]
pub struct ActionLinkRegistry<A> {
    server_addr: String,
    routes: BTreeMap<A, ActionLink>,
}

impl<A: Ord + Copy> ActionLinkRegistry<A> {
    pub fn new(server_addr: impl Into<String>) -> Self {
        Self {
            server_addr: server_addr.into().trim_end_matches('/').to_string(),
            routes: BTreeMap::new(),
        }
    }

    /// Register `route` (relative to the server address) for `action`
    pub fn register(mut self, action: A, name: impl Into<String>, route: &str) -> Self {
        self.routes.insert(
            action,
            ActionLink {
                name: name.into(),
                href: format!("{}{}", self.server_addr, route),
            },
        );
        self
    }

    pub fn server_addr(&self) -> &str {
        &self.server_addr
    }
}

impl<A: Ord + Copy> HypermediaMapper<A> for ActionLinkRegistry<A> {
    fn action_links(&self) -> &BTreeMap<A, ActionLink> {
        &self.routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::{Action, Incident, IncidentId, State};

    fn registry() -> ActionLinkRegistry<Action> {
        ActionLinkRegistry::new("http://localhost:8080/")
            .register(Action::Cancel, "CancelIncident", "/incidents/{uuid}/cancel")
            .register(
                Action::StartWorking,
                "IncidentStartWorking",
                "/incidents/{uuid}/start_working",
            )
    }

    fn incident_in(state: State) -> (Incident, IncidentId) {
        let id: IncidentId = "2af4f493-0bd5-4513-b440-6cbb465feadb".parse().unwrap();
        let mut incident = Incident::new("ABC123", "disk full");
        incident.set_id(id).unwrap();
        incident.set_state(state);
        (incident, id)
    }

    #[test]
    fn test_links_for_new_incident() {
        let (incident, id) = incident_in(State::New);

        let links = registry().links_for(&incident);

        assert_eq!(links.len(), 2);
        assert_eq!(
            links["CancelIncident"].href,
            format!("http://localhost:8080/incidents/{}/cancel", id)
        );
        assert_eq!(
            links["IncidentStartWorking"].href,
            format!("http://localhost:8080/incidents/{}/start_working", id)
        );
    }

    #[test]
    fn test_links_only_for_allowed_actions() {
        let (incident, _) = incident_in(State::InProgress);

        let links = registry().links_for(&incident);

        assert_eq!(links.len(), 1);
        assert!(links.contains_key("CancelIncident"));
        assert!(!links.contains_key("IncidentStartWorking"));
    }

    #[test]
    fn test_terminal_state_has_no_links() {
        let (incident, _) = incident_in(State::Cancelled);
        assert!(registry().links_for(&incident).is_empty());
    }

    #[test]
    fn test_unregistered_action_is_skipped() {
        let (incident, _) = incident_in(State::New);
        let partial = ActionLinkRegistry::new("http://localhost:8080").register(
            Action::Cancel,
            "CancelIncident",
            "/incidents/{uuid}/cancel",
        );

        let links = partial.links_for(&incident);

        assert_eq!(links.keys().collect::<Vec<_>>(), vec!["CancelIncident"]);
    }

    #[test]
    fn test_unidentified_resource_has_no_links() {
        let incident = Incident::new("ABC123", "disk full");
        assert!(registry().links_for(&incident).is_empty());
    }
}
