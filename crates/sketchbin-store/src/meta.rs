use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Suffix appended to a document id to name its sidecar file.
pub const META_SUFFIX: &str = ".meta.json";

/// Suffix of the scratch file a sidecar is written to before being renamed
/// into place.
const TMP_SUFFIX: &str = ".tmp";

/// Mutable attributes stored next to a payload file.
///
/// The record is always read and written whole.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl DocumentMeta {
    /// `true` when no attribute is set, i.e. the sidecar can be removed.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.key.is_none()
    }

    /// Load a sidecar. A missing file is an empty record.
    pub fn load(path: &Path) -> StoreResult<Self> {
        match fs::read(path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Serialization(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the record, or remove the sidecar if the record is empty.
    ///
    /// The write goes to a scratch file that is then renamed over the
    /// sidecar, so readers see either the old or the new record. Callers
    /// must serialize concurrent stores to the same path.
    pub fn store(&self, path: &Path) -> StoreResult<()> {
        if self.is_empty() {
            return match fs::remove_file(path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        let json =
            serde_json::to_vec(self).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(TMP_SUFFIX);
        let tmp = PathBuf::from(tmp);
        if let Err(e) = fs::write(&tmp, json).and_then(|()| fs::rename(&tmp, path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}
