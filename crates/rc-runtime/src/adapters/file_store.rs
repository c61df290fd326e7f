//! File-backed key-value store.
//!
//! One file per key (`<key>.json`) under a data directory. Writes go to a
//! temp file first and are renamed into place, so a crash mid-write leaves
//! the previous value intact.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use shared_types::{KeyValueStore, StoreError, StoreKey};
use tracing::{debug, info};

/// [`KeyValueStore`] persisting each key to its own file.
#[derive(Debug)]
pub struct FileKeyValueStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// # Errors
    /// `StoreError::Backend` if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| backend(&dir, &e))?;
        info!(dir = %dir.display(), "File store opened");
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: StoreKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(backend(&path, &e)),
        }
    }

    fn set(&self, key: StoreKey, value: String) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");

        let _guard = self.write_lock.lock();
        let mut file = fs::File::create(&temp_path).map_err(|e| backend(&temp_path, &e))?;
        file.write_all(value.as_bytes())
            .map_err(|e| backend(&temp_path, &e))?;
        file.sync_all().map_err(|e| backend(&temp_path, &e))?;
        fs::rename(&temp_path, &path).map_err(|e| backend(&path, &e))?;

        debug!(key = %key, bytes = value.len(), "Value persisted");
        Ok(())
    }
}

fn backend(path: &Path, err: &io::Error) -> StoreError {
    StoreError::Backend(format!("{}: {err}", path.display()))
}
