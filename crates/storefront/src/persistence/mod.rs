//! Durable storage for collection state.
//!
//! Each collection is written under its own namespaced key as a versioned
//! envelope `{"state": ..., "version": 1}`. Only lines and entries are stored;
//! derived totals are recomputed on load.
//!
//! Durability is best effort. [`PersistenceAdapter::load`] turns missing,
//! corrupt or incompatible data into `None`, and [`StoragePersister`] logs
//! write failures instead of failing the mutation that triggered them.

mod file;
mod memory;
mod observer;

use std::rc::Rc;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use observer::{Change, StateObserver, StoragePersister};

use crate::error::PersistenceError;

/// Record format version written by this build.
pub const RECORD_VERSION: u32 = 1;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "yasira";

/// A string key-value store.
///
/// Methods take `&self`; backends that need mutation use interior
/// mutability. All calls are synchronous.
pub trait StateStorage {
    /// Read the value under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Unavailable` if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Unavailable` if the backend cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Delete the value under `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Unavailable` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

impl<S: StateStorage + ?Sized> StateStorage for Rc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        (**self).remove(key)
    }
}

impl<S: StateStorage + ?Sized> StateStorage for Arc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        (**self).remove(key)
    }
}

/// The record slots, one per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Cart lines.
    Cart,
    /// Wishlist entries.
    Wishlist,
    /// Compare entries.
    Compare,
    /// Signed-in account.
    Session,
}

impl StorageKey {
    /// Every slot, in restore order.
    pub const ALL: [Self; 4] = [Self::Cart, Self::Wishlist, Self::Compare, Self::Session];

    /// Un-namespaced slot name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cart => "cart-storage",
            Self::Wishlist => "wishlist-storage",
            Self::Compare => "compare-storage",
            Self::Session => "auth-storage",
        }
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, R> {
    state: &'a R,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope<R> {
    state: R,
    #[serde(default)]
    version: u32,
}

/// Reads and writes versioned records under namespaced keys.
#[derive(Debug, Clone)]
pub struct PersistenceAdapter<S> {
    storage: S,
    namespace: String,
}

impl<S: StateStorage> PersistenceAdapter<S> {
    /// Wrap a backend. An empty namespace falls back to [`DEFAULT_NAMESPACE`].
    #[must_use]
    pub fn new(storage: S, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let namespace = if namespace.trim().is_empty() {
            DEFAULT_NAMESPACE.to_owned()
        } else {
            namespace
        };
        Self { storage, namespace }
    }

    /// The backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// The full key for a slot, e.g. `yasira:cart-storage`.
    #[must_use]
    pub fn key(&self, slot: StorageKey) -> String {
        format!("{}:{}", self.namespace, slot.name())
    }

    /// Read and decode a record.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the backend fails, `Corrupt` if the value is
    /// not a valid envelope, and `VersionMismatch` for a foreign version.
    pub fn try_load<R: DeserializeOwned>(
        &self,
        slot: StorageKey,
    ) -> Result<Option<R>, PersistenceError> {
        let Some(raw) = self.storage.read(&self.key(slot))? else {
            return Ok(None);
        };
        let envelope: Envelope<R> = serde_json::from_str(&raw)?;
        if envelope.version != RECORD_VERSION {
            return Err(PersistenceError::VersionMismatch {
                found: envelope.version,
                expected: RECORD_VERSION,
            });
        }
        Ok(Some(envelope.state))
    }

    /// Read a record, treating any failure as "nothing stored".
    #[must_use]
    pub fn load<R: DeserializeOwned>(&self, slot: StorageKey) -> Option<R> {
        match self.try_load(slot) {
            Ok(record) => {
                debug!(key = %self.key(slot), found = record.is_some(), "Loaded record");
                record
            }
            Err(e) => {
                warn!(key = %self.key(slot), error = %e, "Discarding unreadable state");
                None
            }
        }
    }

    /// Encode and write a record.
    ///
    /// # Errors
    ///
    /// Returns `Corrupt` if encoding fails and `Unavailable` if the write fails.
    pub fn save<R: Serialize>(&self, slot: StorageKey, record: &R) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(&EnvelopeRef {
            state: record,
            version: RECORD_VERSION,
        })?;
        self.storage.write(&self.key(slot), &raw)
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the backend fails.
    pub fn forget(&self, slot: StorageKey) -> Result<(), PersistenceError> {
        self.storage.remove(&self.key(slot))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::CartRecord;

    fn adapter() -> PersistenceAdapter<MemoryStorage> {
        PersistenceAdapter::new(MemoryStorage::new(), "test")
    }

    #[test]
    fn test_keys_are_namespaced() {
        let adapter = adapter();
        assert_eq!(adapter.key(StorageKey::Cart), "test:cart-storage");
        assert_eq!(adapter.key(StorageKey::Session), "test:auth-storage");
    }

    #[test]
    fn test_blank_namespace_uses_default() {
        let adapter = PersistenceAdapter::new(MemoryStorage::new(), "  ");
        assert_eq!(adapter.key(StorageKey::Compare), "yasira:compare-storage");
    }

    #[test]
    fn test_save_writes_envelope() {
        let adapter = adapter();
        adapter.save(StorageKey::Cart, &CartRecord::default()).unwrap();

        let raw = adapter.storage().read("test:cart-storage").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], RECORD_VERSION);
        assert_eq!(value["state"]["items"], serde_json::json!([]));
    }

    #[test]
    fn test_load_missing_is_none() {
        let loaded: Option<CartRecord> = adapter().load(StorageKey::Cart);
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_corrupt_degrades() {
        let adapter = adapter();
        adapter.storage().write("test:cart-storage", "{not json").unwrap();

        assert!(matches!(
            adapter.try_load::<CartRecord>(StorageKey::Cart),
            Err(PersistenceError::Corrupt(_))
        ));
        assert!(adapter.load::<CartRecord>(StorageKey::Cart).is_none());
    }

    #[test]
    fn test_load_foreign_version_degrades() {
        let adapter = adapter();
        adapter
            .storage()
            .write("test:cart-storage", r#"{"state":{"items":[]},"version":0}"#)
            .unwrap();

        assert!(matches!(
            adapter.try_load::<CartRecord>(StorageKey::Cart),
            Err(PersistenceError::VersionMismatch { found: 0, expected: 1 })
        ));
        assert!(adapter.load::<CartRecord>(StorageKey::Cart).is_none());
    }

    #[test]
    fn test_forget_removes_record() {
        let adapter = adapter();
        adapter.save(StorageKey::Wishlist, &CartRecord::default()).unwrap();
        adapter.forget(StorageKey::Wishlist).unwrap();
        assert!(adapter.storage().is_empty());
    }
}
