//! Config Entry Store
//!
//! Storage-backed repository for the integration's configuration entry.
//! The integration is single-instance: `add` rejects a second entry and
//! the flows consult `is_empty` before showing any form.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::entry::ConfigEntry;
use crate::storage::{Storage, StorageFile};

/// Storage key for config entries
pub const STORAGE_KEY: &str = "onemeter.config_entries";
/// Current storage version
pub const STORAGE_VERSION: u32 = 1;
/// Current minor version
pub const STORAGE_MINOR_VERSION: u32 = 1;

/// Config entry store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("An entry is already configured for this installation")]
    AlreadyConfigured,

    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Config entries data for storage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigEntriesData {
    entries: Vec<ConfigEntry>,
}

/// Storage-backed store for the integration's config entry.
///
/// Holds at most one entry. All mutations persist immediately.
pub struct ConfigEntryStore {
    storage: Arc<Storage>,
    entries: DashMap<String, ConfigEntry>,
}

impl ConfigEntryStore {
    /// Create a new store on top of a storage backend
    pub fn new(storage: Arc<Storage>) -> Self {
        Self {
            storage,
            entries: DashMap::new(),
        }
    }

    /// Load entries from storage
    pub async fn load(&self) -> StoreResult<()> {
        if let Some(storage_file) = self
            .storage
            .load::<ConfigEntriesData>(STORAGE_KEY)
            .await?
        {
            info!(
                "Loading {} config entries from storage (v{}.{})",
                storage_file.data.entries.len(),
                storage_file.version,
                storage_file.minor_version
            );

            for entry in storage_file.data.entries {
                self.entries.insert(entry.entry_id.clone(), entry);
            }
        }
        Ok(())
    }

    /// Save entries to storage
    pub async fn save(&self) -> StoreResult<()> {
        let data = ConfigEntriesData {
            entries: self.entries.iter().map(|r| r.value().clone()).collect(),
        };

        let storage_file =
            StorageFile::new(STORAGE_KEY, data, STORAGE_VERSION, STORAGE_MINOR_VERSION);

        self.storage.save(&storage_file).await?;
        debug!("Saved {} config entries to storage", self.entries.len());
        Ok(())
    }

    /// Get an entry by ID
    pub fn get(&self, entry_id: &str) -> Option<ConfigEntry> {
        self.entries.get(entry_id).map(|r| r.value().clone())
    }

    /// Get the configured entry, if any
    pub fn first(&self) -> Option<ConfigEntry> {
        self.entries.iter().next().map(|r| r.value().clone())
    }

    /// Add the config entry.
    ///
    /// Fails with [`StoreError::AlreadyConfigured`] when an entry already
    /// exists - the single-instance invariant.
    pub async fn add(&self, entry: ConfigEntry) -> StoreResult<ConfigEntry> {
        if !self.entries.is_empty() {
            return Err(StoreError::AlreadyConfigured);
        }

        self.entries.insert(entry.entry_id.clone(), entry.clone());
        self.save().await?;

        info!("Added config entry: {} [{}]", entry.title, entry.entry_id);
        Ok(entry)
    }

    /// Replace an entry's options and persist.
    ///
    /// Merge semantics live in the options flow; the store writes the map
    /// it is handed.
    pub async fn update_options(
        &self,
        entry_id: &str,
        options: HashMap<String, serde_json::Value>,
    ) -> StoreResult<ConfigEntry> {
        let mut entry = self
            .get(entry_id)
            .ok_or_else(|| StoreError::NotFound(entry_id.to_string()))?;

        entry.options = options;
        entry.modified_at = Utc::now();

        self.entries.insert(entry_id.to_string(), entry.clone());
        self.save().await?;

        debug!("Updated options for config entry: {}", entry_id);
        Ok(entry)
    }

    /// Remove an entry
    pub async fn remove(&self, entry_id: &str) -> StoreResult<ConfigEntry> {
        let (_, entry) = self
            .entries
            .remove(entry_id)
            .ok_or_else(|| StoreError::NotFound(entry_id.to_string()))?;

        self.save().await?;

        info!("Removed config entry: {} [{}]", entry.title, entry_id);
        Ok(entry)
    }

    /// Get count of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no entry is configured yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
