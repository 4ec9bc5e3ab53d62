//! Local persistence for saved designs, the autosave slot and preferences.
//!
//! - `KeyValueStore` is the seam: whole-value `get`/`set`/`remove` per key
//! - `FileStore` keeps one `<key>.json` file per key (native builds)
//! - `MemoryStore` keeps everything in a map (wasm builds and tests)
//! - `repositories` layers typed, self-healing access on top

mod repositories;

pub use repositories::{
    AUTO_SAVE_KEY, AUTO_SAVE_PREF_KEY, AutoSaveRepository, PreferenceRepository,
    SAVED_DESIGNS_KEY, SavedDesignRepository,
};

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("storage backend unavailable: {0}")]
    Backend(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Whole-value key/value storage. Writes replace the previous value.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
    fn keys(&self) -> Vec<String>;
    fn clear(&self) -> StorageResult<()>;
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// Default location of the file store.
pub fn default_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        return data_dir.join("roomstyler").join("storage");
    }

    PathBuf::from("cache").join("storage")
}

/// Sanitize storage key for filesystem use
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect()
}

// ============================================
// File-backed store
// ============================================

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

impl KeyValueStore for FileStore {
    /// A file that is not UTF-8 text is unreadable for good and gets removed.
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                tracing::warn!(key, error = %err, "discarding undecodable storage file");
                if let Err(remove_err) = fs::remove_file(&path) {
                    tracing::warn!(key, error = %remove_err, "failed to remove storage file");
                }
                None
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read storage file");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        fs::create_dir_all(&self.dir)?;
        let final_path = self.path_for(key);
        let tmp_path = self.dir.join(format!("{}.json.tmp", sanitize_key(key)));
        fs::write(&tmp_path, value)?;
        match fs::rename(&tmp_path, &final_path) {
            Ok(()) => Ok(()),
            Err(rename_err) => {
                if final_path.exists() {
                    fs::remove_file(&final_path)?;
                    fs::rename(&tmp_path, &final_path)?;
                    Ok(())
                } else {
                    Err(rename_err.into())
                }
            }
        }
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let file_path = self.path_for(key);
        if file_path.exists() {
            fs::remove_file(file_path)?;
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        if !self.dir.exists() {
            return Vec::new();
        }
        fs::read_dir(&self.dir)
            .ok()
            .map(|entries| {
                entries
                    .flatten()
                    .filter_map(|entry| {
                        let path = entry.path();
                        if path.extension().and_then(|e| e.to_str()) == Some("json") {
                            path.file_stem()
                                .and_then(|s| s.to_str())
                                .map(|s| s.to_string())
                        } else {
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn clear(&self) -> StorageResult<()> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

// ============================================
// In-memory store
// ============================================

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a store with raw values, as if a previous run had written them.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Self {
            entries: Mutex::new(map),
        }
    }

    fn lock(&self) -> StorageResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.lock()
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn clear(&self) -> StorageResult<()> {
        self.lock()?.clear();
        Ok(())
    }
}

/// Store used by the application for the current platform.
#[cfg(not(target_arch = "wasm32"))]
pub fn platform_store(dir: Option<PathBuf>) -> SharedStore {
    Arc::new(FileStore::new(dir.unwrap_or_else(default_data_dir)))
}

#[cfg(target_arch = "wasm32")]
pub fn platform_store(_dir: Option<PathBuf>) -> SharedStore {
    Arc::new(MemoryStore::new())
}
