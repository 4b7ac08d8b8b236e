// Preference store for cached lookup data and the last-shown marker.
// Key-value storage with a filesystem backend and an in-memory backend.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::warn;

use crate::error::{ReleaseNotesError, Result};

use super::paths::key_path;

/// Key holding the raw bytes of the last lookup response.
pub const CACHED_LOOKUP_KEY: &str = "cachedLookupData";

/// Key holding the app version the release notes sheet was last shown for.
pub const LAST_SHOWN_KEY: &str = "lastVersionSheetShownFor";

/// Key-value storage for raw bytes and strings.
///
/// Reads report absence as `None`; a backend that cannot read a value logs
/// the problem and reports it as absent. Writes replace the whole value.
pub trait PreferenceStore: Send + Sync {
    fn data(&self, key: &str) -> Option<Vec<u8>>;

    fn set_data(&self, key: &str, value: &[u8]) -> Result<()>;

    fn string(&self, key: &str) -> Option<String> {
        self.data(key)
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.set_data(key, value.as_bytes())
    }

    fn remove(&self, key: &str) -> Result<()>;
}

/// Store backed by one file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store under the per-user cache directory.
    pub fn from_default_dir() -> Result<Self> {
        super::paths::cache_dir()
            .map(Self::new)
            .ok_or_else(|| ReleaseNotesError::Other("no cache directory for this user".to_string()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PreferenceStore for FileStore {
    fn data(&self, key: &str) -> Option<Vec<u8>> {
        let path = key_path(&self.root, key);
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read cached value");
                None
            }
        }
    }

    fn set_data(&self, key: &str, value: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.root)?;

        let path = key_path(&self.root, key);

        // Write atomically via temp file
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(value)?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = key_path(&self.root, key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // A poisoned map is still a consistent map: every write is a single insert.
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PreferenceStore for MemoryStore {
    fn data(&self, key: &str) -> Option<Vec<u8>> {
        self.values().get(key).cloned()
    }

    fn set_data(&self, key: &str, value: &[u8]) -> Result<()> {
        self.values().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values().remove(key);
        Ok(())
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for std::sync::Arc<S> {
    fn data(&self, key: &str) -> Option<Vec<u8>> {
        (**self).data(key)
    }

    fn set_data(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set_data(key, value)
    }

    fn string(&self, key: &str) -> Option<String> {
        (**self).string(key)
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_string(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
