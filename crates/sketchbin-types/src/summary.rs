use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::DocumentId;

/// One entry of a document listing.
///
/// `key` travels with the summary so callers can compose share links; it is
/// opaque to the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: DocumentId,
    /// Payload size in bytes.
    pub size: u64,
    /// Creation time, if known. Unknown timestamps sort as oldest.
    pub created_at: Option<DateTime<Utc>>,
    pub name: Option<String>,
    pub key: Option<String>,
}

impl DocumentSummary {
    pub fn new(id: DocumentId, size: u64, created_at: Option<DateTime<Utc>>) -> Self {
        Self {
            id,
            size,
            created_at,
            name: None,
            key: None,
        }
    }
}

/// Sort summaries newest first; entries without a timestamp go last.
pub fn sort_newest_first(items: &mut [DocumentSummary]) {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
