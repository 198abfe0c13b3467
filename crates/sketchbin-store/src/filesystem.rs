use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use sketchbin_types::{sort_newest_first, DocumentId, DocumentSummary};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::meta::{DocumentMeta, META_SUFFIX};
use crate::traits::{normalize_name, DocumentStore};

/// Directory-backed document store.
///
/// Layout under `root`:
/// ```text
/// <id>             payload bytes
/// <id>.meta.json   optional sidecar holding name and key
/// ```
/// Creation time is the payload file's modification time. Only file names
/// that parse as a [`DocumentId`] are treated as documents.
pub struct FilesystemDocumentStore {
    root: PathBuf,
    /// Serializes sidecar read-modify-write and delete.
    meta_lock: Mutex<()>,
}

impl FilesystemDocumentStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            meta_lock: Mutex::new(()),
        })
    }

    /// The storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn payload_path(&self, id: &DocumentId) -> PathBuf {
        self.root.join(id.to_hex())
    }

    fn meta_path(&self, id: &DocumentId) -> PathBuf {
        self.root.join(format!("{}{META_SUFFIX}", id.to_hex()))
    }

    fn lock_meta(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.meta_lock
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn payload_exists(&self, id: &DocumentId) -> bool {
        self.payload_path(id).is_file()
    }

    /// Load a sidecar, treating an undecodable one as empty.
    fn load_meta(&self, id: &DocumentId) -> StoreResult<DocumentMeta> {
        match DocumentMeta::load(&self.meta_path(id)) {
            Err(StoreError::Serialization(reason)) => {
                warn!(%id, %reason, "ignoring unreadable sidecar");
                Ok(DocumentMeta::default())
            }
            other => other,
        }
    }

    /// Read-modify-write the sidecar of an existing document.
    fn update_meta(
        &self,
        id: &DocumentId,
        apply: impl FnOnce(&mut DocumentMeta),
    ) -> StoreResult<bool> {
        let _guard = self.lock_meta()?;
        if !self.payload_exists(id) {
            return Ok(false);
        }
        let mut meta = self.load_meta(id)?;
        apply(&mut meta);
        meta.store(&self.meta_path(id))?;
        Ok(true)
    }

    /// Listing row for a payload file. Sidecar trouble never hides a document.
    fn summarize(&self, id: DocumentId, metadata: &fs::Metadata) -> DocumentSummary {
        let created_at = metadata.modified().ok().map(DateTime::<Utc>::from);
        let mut summary = DocumentSummary::new(id, metadata.len(), created_at);
        let meta = self.load_meta(&id).unwrap_or_else(|e| {
            warn!(%id, error = %e, "skipping sidecar while listing");
            DocumentMeta::default()
        });
        summary.name = meta.name;
        summary.key = meta.key;
        summary
    }
}

/// Run `write` against a freshly created payload file. On failure the file
/// is removed so a truncated payload never becomes a document.
fn write_or_discard(path: &Path, write: impl FnOnce() -> io::Result<()>) -> StoreResult<()> {
    if let Err(e) = write() {
        if let Err(cleanup) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %cleanup, "failed to remove partial payload");
        }
        return Err(e.into());
    }
    Ok(())
}

impl DocumentStore for FilesystemDocumentStore {
    fn create(&self, payload: &[u8]) -> StoreResult<DocumentId> {
        loop {
            let id = DocumentId::generate();
            let path = self.payload_path(&id);
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            write_or_discard(&path, || {
                file.write_all(payload)?;
                file.sync_all()
            })?;
            debug!(%id, size = payload.len(), path = %path.display(), "created document");
            return Ok(id);
        }
    }

    fn find(&self, id: &DocumentId) -> StoreResult<Option<Vec<u8>>> {
        let path = self.payload_path(id);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            // Only regular files are documents.
            Err(_) if !path.is_file() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> StoreResult<Vec<DocumentSummary>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut items = Vec::new();
        for entry in entries {
            let entry = entry?;
            let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<DocumentId>().ok())
            else {
                continue;
            };
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                // Removed between read_dir and stat.
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            if !metadata.is_file() {
                continue;
            }
            items.push(self.summarize(id, &metadata));
        }

        sort_newest_first(&mut items);
        Ok(items)
    }

    fn delete(&self, id: &DocumentId) -> StoreResult<bool> {
        let _guard = self.lock_meta()?;
        if !self.payload_exists(id) {
            return Ok(false);
        }
        match fs::remove_file(self.payload_path(id)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        }
        let meta_path = self.meta_path(id);
        if let Err(e) = fs::remove_file(&meta_path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(%id, error = %e, path = %meta_path.display(), "failed to remove sidecar");
            }
        }
        debug!(%id, "deleted document");
        Ok(true)
    }

    fn set_name(&self, id: &DocumentId, name: Option<&str>) -> StoreResult<bool> {
        let name = normalize_name(name);
        self.update_meta(id, |meta| meta.name = name)
    }

    fn get_name(&self, id: &DocumentId) -> StoreResult<Option<String>> {
        if !self.payload_exists(id) {
            return Ok(None);
        }
        Ok(self.load_meta(id)?.name)
    }

    fn set_key(&self, id: &DocumentId, key: &str) -> StoreResult<bool> {
        let key = key.to_string();
        self.update_meta(id, |meta| meta.key = Some(key))
    }

    fn get_key(&self, id: &DocumentId) -> StoreResult<Option<String>> {
        if !self.payload_exists(id) {
            return Ok(None);
        }
        Ok(self.load_meta(id)?.key)
    }

    fn exists(&self, id: &DocumentId) -> StoreResult<bool> {
        Ok(self.payload_exists(id))
    }
}

impl std::fmt::Debug for FilesystemDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilesystemDocumentStore")
            .field("root", &self.root)
            .finish()
    }
}
