use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use sketchbin_types::{DocumentId, DocumentSummary};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{normalize_name, DocumentStore};

/// Parallel maps keyed by document id.
///
/// `payloads` is authoritative for existence; the other maps only ever hold
/// ids that are also in `payloads`.
#[derive(Default)]
struct MemoryState {
    payloads: HashMap<DocumentId, Vec<u8>>,
    created: HashMap<DocumentId, (DateTime<Utc>, u64)>,
    names: HashMap<DocumentId, String>,
    keys: HashMap<DocumentId, String>,
    /// Creation counter used to break timestamp ties in `list`.
    next_seq: u64,
}

/// In-memory, HashMap-based document store.
///
/// Process-scoped: everything is lost when the store is dropped. All maps sit
/// behind one `RwLock` so a delete removes payload and metadata together.
pub struct InMemoryDocumentStore {
    state: RwLock<MemoryState>,
}

impl InMemoryDocumentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
        }
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_state()?.payloads.len())
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    fn read_state(&self) -> StoreResult<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write_state(&self) -> StoreResult<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn create(&self, payload: &[u8]) -> StoreResult<DocumentId> {
        let mut state = self.write_state()?;
        let mut id = DocumentId::generate();
        while state.payloads.contains_key(&id) {
            id = DocumentId::generate();
        }
        let seq = state.next_seq;
        state.next_seq += 1;
        state.payloads.insert(id, payload.to_vec());
        state.created.insert(id, (Utc::now(), seq));
        debug!(%id, size = payload.len(), "created document in memory");
        Ok(id)
    }

    fn find(&self, id: &DocumentId) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.read_state()?.payloads.get(id).cloned())
    }

    fn list(&self) -> StoreResult<Vec<DocumentSummary>> {
        let state = self.read_state()?;
        let mut rows: Vec<(Option<(DateTime<Utc>, u64)>, DocumentSummary)> = state
            .payloads
            .iter()
            .map(|(id, payload)| {
                let created = state.created.get(id).copied();
                let mut summary =
                    DocumentSummary::new(*id, payload.len() as u64, created.map(|(at, _)| at));
                summary.name = state.names.get(id).cloned();
                summary.key = state.keys.get(id).cloned();
                (created, summary)
            })
            .collect();
        rows.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(rows.into_iter().map(|(_, summary)| summary).collect())
    }

    fn delete(&self, id: &DocumentId) -> StoreResult<bool> {
        let mut state = self.write_state()?;
        let existed = state.payloads.remove(id).is_some();
        state.created.remove(id);
        state.names.remove(id);
        state.keys.remove(id);
        if existed {
            debug!(%id, "deleted document from memory");
        }
        Ok(existed)
    }

    fn set_name(&self, id: &DocumentId, name: Option<&str>) -> StoreResult<bool> {
        let mut state = self.write_state()?;
        if !state.payloads.contains_key(id) {
            return Ok(false);
        }
        match normalize_name(name) {
            Some(name) => state.names.insert(*id, name),
            None => state.names.remove(id),
        };
        Ok(true)
    }

    fn get_name(&self, id: &DocumentId) -> StoreResult<Option<String>> {
        Ok(self.read_state()?.names.get(id).cloned())
    }

    fn set_key(&self, id: &DocumentId, key: &str) -> StoreResult<bool> {
        let mut state = self.write_state()?;
        if !state.payloads.contains_key(id) {
            return Ok(false);
        }
        state.keys.insert(*id, key.to_string());
        Ok(true)
    }

    fn get_key(&self, id: &DocumentId) -> StoreResult<Option<String>> {
        Ok(self.read_state()?.keys.get(id).cloned())
    }

    fn exists(&self, id: &DocumentId) -> StoreResult<bool> {
        Ok(self.read_state()?.payloads.contains_key(id))
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len().unwrap_or_default();
        f.debug_struct("InMemoryDocumentStore")
            .field("document_count", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_is_empty() {
        let store = InMemoryDocumentStore::new();
        assert!(store.is_empty().unwrap());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn create_and_find() {
        let store = InMemoryDocumentStore::new();
        let id = store.create(b"hello world").unwrap();
        assert_eq!(store.find(&id).unwrap().as_deref(), Some(&b"hello world"[..]));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn identical_payloads_get_distinct_ids() {
        let store = InMemoryDocumentStore::new();
        let a = store.create(b"same").unwrap();
        let b = store.create(b"same").unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn delete_drops_metadata() {
        let store = InMemoryDocumentStore::new();
        let id = store.create(b"x").unwrap();
        store.set_name(&id, Some("drawing")).unwrap();
        store.set_key(&id, "k").unwrap();

        assert!(store.delete(&id).unwrap());
        assert!(store.get_name(&id).unwrap().is_none());
        assert!(store.get_key(&id).unwrap().is_none());
        assert!(!store.exists(&id).unwrap());
    }

    #[test]
    fn list_breaks_timestamp_ties_by_creation_order() {
        let store = InMemoryDocumentStore::new();
        let ids: Vec<DocumentId> = (0..20).map(|i| store.create(&[i]).unwrap()).collect();
        let listed: Vec<DocumentId> = store.list().unwrap().into_iter().map(|s| s.id).collect();
        let expected: Vec<DocumentId> = ids.into_iter().rev().collect();
        assert_eq!(listed, expected);
    }

    #[test]
    fn list_carries_name_and_key() {
        let store = InMemoryDocumentStore::new();
        let id = store.create(b"abc").unwrap();
        store.set_name(&id, Some("plan")).unwrap();
        store.set_key(&id, "secret").unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].size, 3);
        assert_eq!(listed[0].name.as_deref(), Some("plan"));
        assert_eq!(listed[0].key.as_deref(), Some("secret"));
        assert!(listed[0].created_at.is_some());
    }

    #[test]
    fn debug_shows_count() {
        let store = InMemoryDocumentStore::new();
        store.create(b"a").unwrap();
        assert!(format!("{store:?}").contains("document_count: 1"));
    }
}
