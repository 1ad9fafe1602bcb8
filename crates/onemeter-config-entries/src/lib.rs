//! Config Entries
//!
//! The configuration record for the OneMeter integration and the store
//! that persists it. The store doubles as the single-instance query the
//! setup flow consults: at most one entry may exist per installation.
//!
//! # Key Types
//!
//! - [`ConfigEntry`] - the persisted configuration record
//! - [`ConfigEntryStore`] - storage-backed repository enforcing the
//!   single-instance invariant
//!
//! # Storage
//!
//! Entries are persisted in `.storage/onemeter.config_entries` with
//! version tracking.

pub mod entry;
pub mod storage;
pub mod store;

pub use entry::ConfigEntry;
pub use storage::{Storage, StorageError, StorageFile, StorageResult};
pub use store::{
    ConfigEntryStore, StoreError, StoreResult, STORAGE_KEY, STORAGE_MINOR_VERSION, STORAGE_VERSION,
};
