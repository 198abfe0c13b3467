//! Construction-time backend selection.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::filesystem::FilesystemDocumentStore;
use crate::memory::InMemoryDocumentStore;
use crate::traits::DocumentStore;

/// Which backend to construct.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Memory,
    Filesystem,
}

impl FromStr for StorageKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "filesystem" => Ok(Self::Filesystem),
            _ => Err(StoreError::UnknownBackend(s.to_string())),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Filesystem => f.write_str("filesystem"),
        }
    }
}

/// Storage section of the server configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub kind: StorageKind,
    /// Root directory for the filesystem backend. Ignored by `memory`.
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

fn default_root() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::default(),
            root: default_root(),
        }
    }
}

/// Build the configured backend. Called once at startup.
pub fn open_store(config: &StorageConfig) -> StoreResult<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match config.kind {
        StorageKind::Memory => Arc::new(InMemoryDocumentStore::new()),
        StorageKind::Filesystem => Arc::new(FilesystemDocumentStore::open(&config.root)?),
    };
    info!(backend = %config.kind, "document store ready");
    Ok(store)
}
