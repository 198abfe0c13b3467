use std::fmt::Debug;

use sketchbin_types::{DocumentId, DocumentSummary};

use crate::error::StoreResult;

/// Storage for opaque document payloads and their metadata.
///
/// All implementations must satisfy these invariants:
/// - A document exists if and only if its payload is present. Name and key
///   are auxiliary and never keep a document alive on their own.
/// - Payloads are immutable once created; they come back byte-for-byte.
/// - Ids are generated by the store and never reused.
/// - Metadata setters on an unknown id change nothing and return `false`.
/// - `list` is ordered newest first and reflects the state at call time.
pub trait DocumentStore: Send + Sync + Debug {
    /// Persist a payload under a freshly generated id.
    fn create(&self, payload: &[u8]) -> StoreResult<DocumentId>;

    /// Read a payload. Returns `Ok(None)` if the document does not exist.
    fn find(&self, id: &DocumentId) -> StoreResult<Option<Vec<u8>>>;

    /// Summaries of every document, newest first.
    fn list(&self) -> StoreResult<Vec<DocumentSummary>>;

    /// Remove a document with all of its metadata. Returns `true` if it
    /// existed.
    fn delete(&self, id: &DocumentId) -> StoreResult<bool>;

    /// Set or clear the display name. An empty name clears it.
    ///
    /// Returns `false` if the document does not exist.
    fn set_name(&self, id: &DocumentId, name: Option<&str>) -> StoreResult<bool>;

    /// Current display name, if any.
    fn get_name(&self, id: &DocumentId) -> StoreResult<Option<String>>;

    /// Associate an opaque share key with a document.
    ///
    /// Returns `false` if the document does not exist.
    fn set_key(&self, id: &DocumentId, key: &str) -> StoreResult<bool>;

    /// Current share key, if any.
    fn get_key(&self, id: &DocumentId) -> StoreResult<Option<String>>;

    /// Check whether a document exists.
    ///
    /// Default implementation reads the payload. Backends may override with
    /// a cheaper probe.
    fn exists(&self, id: &DocumentId) -> StoreResult<bool> {
        Ok(self.find(id)?.is_some())
    }
}

/// Normalize a requested name: empty strings mean "clear".
pub(crate) fn normalize_name(name: Option<&str>) -> Option<String> {
    name.filter(|n| !n.is_empty()).map(str::to_string)
}
