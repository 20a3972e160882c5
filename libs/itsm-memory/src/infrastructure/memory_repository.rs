//! In-Memory Incident Repository Implementation
//!
//! Records live in one growable arena in insertion order. A primary index maps
//! `(channel, id)` to an arena slot, a per-channel list keeps the insertion order
//! for listing, and a secondary index enforces unique numbers per channel.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use itsm_domain::{
    ChannelId, DomainError, Incident, IncidentId, IncidentRepository, Page, PageRequest, Result,
};
use tracing::{debug, error, info, instrument, warn, Instrument, Span};

use super::record::StoredIncident;

#[derive(Debug, Default)]
struct Store {
    arena: Vec<StoredIncident>,
    index: HashMap<(ChannelId, IncidentId), usize>,
    numbers: HashSet<(ChannelId, String)>,
    by_channel: HashMap<ChannelId, Vec<usize>>,
}

impl Store {
    fn slot(&self, channel_id: &ChannelId, id: &IncidentId) -> Result<usize> {
        self.index
            .get(&(*channel_id, *id))
            .copied()
            .ok_or_else(|| DomainError::not_found("incident"))
    }
}

/// In-memory implementation of the IncidentRepository port
///
/// Every mutation runs inside one write-locked critical section without awaiting,
/// so concurrent adds never interleave and a cancelled caller never leaves a
/// half-written record. Updates compare the caller's revision with the stored
/// one under the same lock. Listing reads a consistent snapshot under the read lock.
///
/// Cloning is cheap and every clone shares the same store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIncidentRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryIncidentRepository {
    pub fn new() -> Self {
        info!("Initializing InMemoryIncidentRepository");
        Self::default()
    }

    /// Total number of stored incidents across all channels
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.arena.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Store>> {
        self.store.read().map_err(|_| {
            error!("Incident store lock is poisoned");
            DomainError::internal("incident store is unavailable")
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Store>> {
        self.store.write().map_err(|_| {
            error!("Incident store lock is poisoned");
            DomainError::internal("incident store is unavailable")
        })
    }

    fn insert(&self, channel_id: ChannelId, incident: &Incident) -> Result<IncidentId> {
        let id = incident.id().unwrap_or_default();
        let mut record = StoredIncident::from_incident(id, incident)?;
        record.revision = 0;

        let mut store = self.write()?;

        if store.index.contains_key(&(channel_id, id)) {
            warn!(incident_id = %id, "Incident ID already exists in channel");
            return Err(DomainError::conflict(format!(
                "incident with ID '{}' already exists",
                id
            )));
        }
        let number_key = (channel_id, record.number.clone());
        if store.numbers.contains(&number_key) {
            warn!(number = %record.number, "Incident number already exists in channel");
            return Err(DomainError::conflict(format!(
                "incident with number '{}' already exists",
                record.number
            )));
        }

        let slot = store.arena.len();
        store.arena.push(record);
        store.index.insert((channel_id, id), slot);
        store.numbers.insert(number_key);
        store.by_channel.entry(channel_id).or_default().push(slot);

        Ok(id)
    }

    fn fetch(&self, channel_id: &ChannelId, id: &IncidentId) -> Result<StoredIncident> {
        let store = self.read()?;
        let slot = store.slot(channel_id, id)?;
        Ok(store.arena[slot].clone())
    }

    fn snapshot(
        &self,
        channel_id: &ChannelId,
        page: PageRequest,
    ) -> Result<(Vec<StoredIncident>, u64)> {
        let store = self.read()?;
        let slots = store
            .by_channel
            .get(channel_id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let records = page
            .window(slots)
            .iter()
            .map(|&slot| store.arena[slot].clone())
            .collect();

        Ok((records, slots.len() as u64))
    }

    fn replace(&self, channel_id: &ChannelId, incident: &Incident) -> Result<u64> {
        let id = incident
            .id()
            .ok_or_else(|| DomainError::not_found("incident"))?;
        let update = StoredIncident::from_incident(id, incident)?;

        let mut store = self.write()?;
        let slot = store.slot(channel_id, &id)?;
        let record = &mut store.arena[slot];
        if record.revision != update.revision {
            warn!(
                stored = record.revision,
                expected = update.revision,
                "Stale incident revision"
            );
            return Err(DomainError::conflict(format!(
                "incident {} was modified concurrently",
                id
            )));
        }
        record.apply_update(update);

        Ok(record.revision)
    }
}

impl IncidentRepository for InMemoryIncidentRepository {
    #[instrument(skip_all, fields(channel_id = %channel_id, number = %incident.number))]
    fn add_incident(
        &self,
        channel_id: &ChannelId,
        incident: &Incident,
    ) -> impl std::future::Future<Output = Result<IncidentId>> + Send {
        let repo = self.clone();
        let channel_id = *channel_id;
        let incident = incident.clone();

        async move {
            let result = repo.insert(channel_id, &incident);
            match &result {
                Ok(id) => info!(incident_id = %id, "Stored incident"),
                Err(err) => warn!(error = %err, "Failed to store incident"),
            }
            result
        }
        .instrument(Span::current())
    }

    #[instrument(skip_all, fields(channel_id = %channel_id, incident_id = %id))]
    fn get_incident(
        &self,
        channel_id: &ChannelId,
        id: &IncidentId,
    ) -> impl std::future::Future<Output = Result<Incident>> + Send {
        let repo = self.clone();
        let channel_id = *channel_id;
        let id = *id;

        async move {
            let record = repo.fetch(&channel_id, &id)?;
            debug!("Loaded incident record");
            record.to_incident().map_err(|err| {
                error!(error = %err, "Failed to materialize incident");
                err
            })
        }
        .instrument(Span::current())
    }

    #[instrument(skip_all, fields(channel_id = %channel_id, page = page.page(), per_page = page.per_page()))]
    fn list_incidents(
        &self,
        channel_id: &ChannelId,
        page: PageRequest,
    ) -> impl std::future::Future<Output = Result<Page<Incident>>> + Send {
        let repo = self.clone();
        let channel_id = *channel_id;

        async move {
            let (records, total) = repo.snapshot(&channel_id, page)?;
            debug!(count = records.len(), total, "Listed incident records");
            let items = records
                .iter()
                .map(StoredIncident::to_incident)
                .collect::<Result<Vec<_>>>()
                .map_err(|err| {
                    error!(error = %err, "Failed to materialize incident");
                    err
                })?;
            Ok(Page::new(items, page, total))
        }
        .instrument(Span::current())
    }

    #[instrument(skip_all, fields(channel_id = %channel_id, incident_id = ?incident.id()))]
    fn update_incident(
        &self,
        channel_id: &ChannelId,
        incident: &Incident,
    ) -> impl std::future::Future<Output = Result<u64>> + Send {
        let repo = self.clone();
        let channel_id = *channel_id;
        let incident = incident.clone();

        async move {
            let result = repo.replace(&channel_id, &incident);
            match &result {
                Ok(revision) => info!(revision, "Updated incident"),
                Err(err) => warn!(error = %err, "Failed to update incident"),
            }
            result
        }
        .instrument(Span::current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poisoned_store_is_reported() {
        let repo = InMemoryIncidentRepository::new();
        assert_eq!(repo.len().unwrap(), 0);

        let store = repo.store.clone();
        let result = std::thread::spawn(move || {
            let _guard = store.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(result.is_err());

        assert!(matches!(repo.len(), Err(DomainError::Internal(_))));
        assert!(repo.is_empty().is_err());
    }
}
