use super::{SharedStore, StorageResult};
use crate::types::{AutoSavedDesign, SavedDesign};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const SAVED_DESIGNS_KEY: &str = "savedDesigns";
pub const AUTO_SAVE_PREF_KEY: &str = "isAutoSaveEnabled";
pub const AUTO_SAVE_KEY: &str = "autoSavedDesign";

/// Reads a JSON slot. A slot that does not parse is deleted and read as
/// absent.
fn read_slot<T: DeserializeOwned>(store: &SharedStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "discarding corrupt storage slot");
            if let Err(remove_err) = store.remove(key) {
                tracing::warn!(key, error = %remove_err, "failed to remove corrupt slot");
            }
            None
        }
    }
}

fn write_slot<T: Serialize + ?Sized>(store: &SharedStore, key: &str, value: &T) -> StorageResult<()> {
    let serialized = serde_json::to_string(value)?;
    store.set(key, &serialized)
}

/// The user's committed designs, persisted as one array.
#[derive(Clone)]
pub struct SavedDesignRepository {
    store: SharedStore,
}

impl SavedDesignRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Vec<SavedDesign> {
        read_slot(&self.store, SAVED_DESIGNS_KEY).unwrap_or_default()
    }

    pub fn replace_all(&self, designs: &[SavedDesign]) -> StorageResult<()> {
        write_slot(&self.store, SAVED_DESIGNS_KEY, designs)
    }
}

/// The single autosave slot.
#[derive(Clone)]
pub struct AutoSaveRepository {
    store: SharedStore,
}

impl AutoSaveRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Option<AutoSavedDesign> {
        read_slot(&self.store, AUTO_SAVE_KEY)
    }

    pub fn store(&self, design: &AutoSavedDesign) -> StorageResult<()> {
        write_slot(&self.store, AUTO_SAVE_KEY, design)
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.store.remove(AUTO_SAVE_KEY)
    }
}

#[derive(Clone)]
pub struct PreferenceRepository {
    store: SharedStore,
}

impl PreferenceRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Autosave is on unless the user turned it off.
    pub fn autosave_enabled(&self) -> bool {
        read_slot(&self.store, AUTO_SAVE_PREF_KEY).unwrap_or(true)
    }

    pub fn set_autosave_enabled(&self, enabled: bool) -> StorageResult<()> {
        write_slot(&self.store, AUTO_SAVE_PREF_KEY, &enabled)
    }
}
