use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::debug;

use crate::error::{DocDbError, DocDbResult};
use crate::wire::{
    BatchGetRequest, BatchGetResult, CommitRequest, CommitResponse, FoundDocument, WriteResult,
};

/// In-process map from document name to field set.
///
/// Only the first entry of any write or name list is honoured. Timestamps
/// are the time of the call; nothing is versioned.
#[derive(Debug, Default)]
pub struct DocDb {
    documents: Mutex<HashMap<String, Value>>,
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

impl DocDb {
    /// Create an empty emulator.
    pub fn new() -> Self {
        Self::default()
    }

    fn documents(&self) -> DocDbResult<MutexGuard<'_, HashMap<String, Value>>> {
        self.documents
            .lock()
            .map_err(|e| DocDbError::Poisoned(e.to_string()))
    }

    /// Number of stored field sets.
    pub fn len(&self) -> DocDbResult<usize> {
        Ok(self.documents()?.len())
    }

    /// Returns `true` if nothing has been committed.
    pub fn is_empty(&self) -> DocDbResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Store the first write's fields under its name, replacing any previous
    /// value.
    pub fn commit(&self, request: CommitRequest) -> DocDbResult<CommitResponse> {
        let write = request.writes.into_iter().next().ok_or(DocDbError::NoWrites)?;
        let update = write.update.unwrap_or_default();
        let name = update
            .name
            .filter(|n| !n.is_empty())
            .ok_or(DocDbError::MissingName)?;
        debug!(%name, "committing field set");
        self.documents()?.insert(name, update.fields);

        let now = now_rfc3339();
        Ok(CommitResponse {
            write_results: vec![WriteResult {
                update_time: now.clone(),
            }],
            commit_time: now,
        })
    }

    /// Look up the first requested name.
    ///
    /// The response always holds exactly one element.
    pub fn batch_get(&self, request: BatchGetRequest) -> DocDbResult<Vec<BatchGetResult>> {
        let name = request
            .documents
            .into_iter()
            .next()
            .ok_or(DocDbError::NoDocuments)?;
        let fields = self.documents()?.get(&name).cloned();
        let now = now_rfc3339();

        let result = match fields {
            Some(fields) => BatchGetResult {
                found: Some(FoundDocument {
                    name,
                    fields,
                    create_time: now.clone(),
                    update_time: now.clone(),
                }),
                missing: None,
                read_time: now,
            },
            None => BatchGetResult {
                found: None,
                missing: Some(name),
                read_time: now,
            },
        };
        Ok(vec![result])
    }
}
