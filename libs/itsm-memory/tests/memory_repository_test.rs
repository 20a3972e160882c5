//! Integration tests for the in-memory incident repository
//!
//! These tests verify that:
//! 1. Incidents round-trip through the store with identity and audit intact
//! 2. Listing is insertion-ordered and positionally paginated
//! 3. Channels are isolated from each other
//! 4. Numbers are unique within a channel
//! 5. Concurrent adds neither lose records nor duplicate identifiers
//! 6. Updates from a stale snapshot are rejected

use std::collections::HashSet;

use itsm_domain::{
    incident::{Action, State},
    ChannelId, DomainError, ExternalUserId, Incident, IncidentId, IncidentRepository,
    PageRequest, Timestamp,
};
use itsm_memory::infrastructure::InMemoryIncidentRepository;

const CHANNEL: &str = "e27ddcd0-0e1f-4bc5-93df-f6f04155beec";
const OTHER_CHANNEL: &str = "9d2c4c43-5f3e-4a43-b1a4-0f8fb0d4c7a1";
const ACTOR: &str = "f49d5fd5-8da4-4779-b5ba-32e78aa2c444";
const ACTOR_2: &str = "00271cb4-3716-4203-9124-1d2f515ae0b2";
const NOW: &str = "2024-03-01T10:00:00Z";

fn channel(s: &str) -> ChannelId {
    s.parse().expect("valid channel id")
}

/// Build an audited incident the way the service would
fn incident(number: &str, short_description: &str, created_by: &str, updated_by: &str) -> Incident {
    let mut inc = Incident::new(number, short_description)
        .with_external_id(Some(format!("ext-{}", number)))
        .with_description(Some(format!("{} description", short_description)));
    inc.set_id(IncidentId::new()).unwrap();

    let now = Timestamp::parse(NOW).unwrap();
    inc.restore_audit(
        &ExternalUserId::new(created_by),
        now,
        &ExternalUserId::new(updated_by),
        now,
    )
    .unwrap();
    inc
}

fn assert_same_content(expected: &Incident, actual: &Incident) {
    assert_eq!(expected.number, actual.number);
    assert_eq!(expected.external_id, actual.external_id);
    assert_eq!(expected.short_description, actual.short_description);
    assert_eq!(expected.description, actual.description);
    assert_eq!(expected.state(), actual.state());
    assert_eq!(expected.created_updated(), actual.created_updated());
}

#[tokio::test]
async fn test_adding_and_getting_incident() {
    let repo = InMemoryIncidentRepository::new();
    let channel_id = channel(CHANNEL);
    let inc = incident("ABC123", "some short description", ACTOR, ACTOR);

    let id = repo.add_incident(&channel_id, &inc).await.unwrap();
    assert_eq!(Some(id), inc.id());

    let stored = repo.get_incident(&channel_id, &id).await.unwrap();

    assert_eq!(stored.id(), Some(id));
    assert_same_content(&inc, &stored);
    assert_eq!(stored.state(), State::New);
    assert_eq!(
        stored.created_updated().created_at().unwrap().to_string(),
        NOW
    );
}

#[tokio::test]
async fn test_unidentified_incident_gets_an_id() {
    let repo = InMemoryIncidentRepository::new();
    let channel_id = channel(CHANNEL);
    let mut inc = Incident::new("ABC123", "disk full");
    inc.stamp_created(&ExternalUserId::new(ACTOR), Timestamp::parse(NOW).unwrap())
        .unwrap();

    let id = repo.add_incident(&channel_id, &inc).await.unwrap();

    let stored = repo.get_incident(&channel_id, &id).await.unwrap();
    assert_eq!(stored.id(), Some(id));
}

#[tokio::test]
async fn test_incomplete_audit_is_refused() {
    let repo = InMemoryIncidentRepository::new();
    let inc = Incident::new("ABC123", "disk full");

    let err = repo.add_incident(&channel(CHANNEL), &inc).await.unwrap_err();

    assert!(matches!(err, DomainError::Internal(_)));
    assert!(repo.is_empty().unwrap());
}

#[tokio::test]
async fn test_list_incidents() {
    let repo = InMemoryIncidentRepository::new();
    let channel_id = channel(CHANNEL);

    let inc1 = incident("Bca258", "some short description", ACTOR, ACTOR);
    let inc2 = incident("CDB36478", "some short description 2", ACTOR, ACTOR_2);
    repo.add_incident(&channel_id, &inc1).await.unwrap();
    repo.add_incident(&channel_id, &inc2).await.unwrap();

    // first page
    let page = repo
        .list_incidents(&channel_id, PageRequest::new(1, 10).unwrap())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 2);
    for (expected, actual) in [&inc1, &inc2].into_iter().zip(&page.items) {
        assert_eq!(expected.id(), actual.id());
        assert_same_content(expected, actual);
    }

    // second page out of range
    let page = repo
        .list_incidents(&channel_id, PageRequest::new(2, 10).unwrap())
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 2);

    // first page with small number per page
    let page = repo
        .list_incidents(&channel_id, PageRequest::new(1, 1).unwrap())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id(), inc1.id());

    let page = repo
        .list_incidents(&channel_id, PageRequest::new(2, 1).unwrap())
        .await
        .unwrap();
    assert_eq!(page.items[0].id(), inc2.id());
}

#[tokio::test]
async fn test_channels_are_isolated() {
    let repo = InMemoryIncidentRepository::new();
    let inc = incident("ABC123", "disk full", ACTOR, ACTOR);
    let id = repo.add_incident(&channel(CHANNEL), &inc).await.unwrap();

    let err = repo
        .get_incident(&channel(OTHER_CHANNEL), &id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));

    let page = repo
        .list_incidents(&channel(OTHER_CHANNEL), PageRequest::new(1, 10).unwrap())
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);

    // the same number is free in another channel
    let other = incident("ABC123", "disk full elsewhere", ACTOR, ACTOR);
    repo.add_incident(&channel(OTHER_CHANNEL), &other)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_unknown_incident() {
    let repo = InMemoryIncidentRepository::new();

    let err = repo
        .get_incident(&channel(CHANNEL), &IncidentId::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn test_duplicate_number_conflicts() {
    let repo = InMemoryIncidentRepository::new();
    let channel_id = channel(CHANNEL);
    repo.add_incident(&channel_id, &incident("ABC123", "first", ACTOR, ACTOR))
        .await
        .unwrap();

    let err = repo
        .add_incident(&channel_id, &incident("ABC123", "second", ACTOR, ACTOR))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Conflict(_)));
    assert_eq!(repo.len().unwrap(), 1);
}

#[tokio::test]
async fn test_duplicate_id_conflicts() {
    let repo = InMemoryIncidentRepository::new();
    let channel_id = channel(CHANNEL);
    let inc = incident("ABC123", "first", ACTOR, ACTOR);
    repo.add_incident(&channel_id, &inc).await.unwrap();

    let mut twin = inc.clone();
    twin.number = "XYZ789".to_string();
    let err = repo.add_incident(&channel_id, &twin).await.unwrap_err();

    assert!(matches!(err, DomainError::Conflict(_)));
}

#[tokio::test]
async fn test_update_incident() {
    let repo = InMemoryIncidentRepository::new();
    let channel_id = channel(CHANNEL);
    let mut inc = incident("ABC123", "disk full", ACTOR, ACTOR);
    let id = repo.add_incident(&channel_id, &inc).await.unwrap();

    inc.apply_action(Action::StartWorking).unwrap();
    inc.short_description = "disk 95% full".to_string();
    inc.stamp_updated(
        &ExternalUserId::new(ACTOR_2),
        Timestamp::parse("2024-03-01T11:00:00Z").unwrap(),
    )
    .unwrap();
    let revision = repo.update_incident(&channel_id, &inc).await.unwrap();
    assert_eq!(revision, 1);

    let stored = repo.get_incident(&channel_id, &id).await.unwrap();
    assert_eq!(stored.revision(), 1);
    assert_eq!(stored.state(), State::InProgress);
    assert_eq!(stored.short_description, "disk 95% full");
    assert_eq!(stored.created_updated().created_by().unwrap().as_str(), ACTOR);
    assert_eq!(stored.created_updated().updated_by().unwrap().as_str(), ACTOR_2);
    assert_eq!(
        stored.created_updated().updated_at().unwrap().to_string(),
        "2024-03-01T11:00:00Z"
    );
}

#[tokio::test]
async fn test_update_from_stale_snapshot_conflicts() {
    let repo = InMemoryIncidentRepository::new();
    let channel_id = channel(CHANNEL);
    let id = repo
        .add_incident(&channel_id, &incident("ABC123", "disk full", ACTOR, ACTOR))
        .await
        .unwrap();

    // two writers load the same snapshot
    let mut cancelling = repo.get_incident(&channel_id, &id).await.unwrap();
    let mut starting = repo.get_incident(&channel_id, &id).await.unwrap();

    cancelling.apply_action(Action::Cancel).unwrap();
    repo.update_incident(&channel_id, &cancelling).await.unwrap();

    starting.apply_action(Action::StartWorking).unwrap();
    let err = repo
        .update_incident(&channel_id, &starting)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    let stored = repo.get_incident(&channel_id, &id).await.unwrap();
    assert_eq!(stored.state(), State::Cancelled);
    assert_eq!(stored.revision(), 1);
}

#[tokio::test]
async fn test_update_in_other_channel_not_found() {
    let repo = InMemoryIncidentRepository::new();
    let inc = incident("ABC123", "disk full", ACTOR, ACTOR);
    repo.add_incident(&channel(CHANNEL), &inc).await.unwrap();

    let err = repo
        .update_incident(&channel(OTHER_CHANNEL), &inc)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds() {
    let repo = InMemoryIncidentRepository::new();
    let channel_id = channel(CHANNEL);

    let handles: Vec<_> = (0..50)
        .map(|i| {
            let repo = repo.clone();
            tokio::spawn(async move {
                let inc = incident(&format!("INC{:04}", i), "load test", ACTOR, ACTOR);
                repo.add_incident(&channel_id, &inc).await
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let id = handle.await.expect("task panicked").expect("add failed");
        assert!(ids.insert(id), "duplicate id {}", id);
    }

    let page = repo
        .list_incidents(&channel_id, PageRequest::new(1, 100).unwrap())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 50);
    assert_eq!(page.total, 50);
    let listed: HashSet<_> = page.items.iter().filter_map(Incident::id).collect();
    assert_eq!(listed, ids);
}
