//! Storage traits and in-memory adapters for the reconciliation engine.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use aroura_core::{Collection, Email};

/// Errors from a guest or remote store.
///
/// The engine never propagates these to its caller; they are logged and
/// recovered by falling back toward whatever state is available.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or the operation failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// The collection could not be serialized for storage.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Visitor-scoped string storage for guest collections.
///
/// Mirrors the browser-local storage contract: keyed get/set/remove of raw
/// strings under fixed keys. Parsing (and malformed-data recovery) is the
/// engine's job, not the store's.
pub trait GuestStore {
    /// Read the raw value under `key`, if any.
    async fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Delete the value under `key`. A no-op if absent.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Per-identity server-side storage for a collection.
///
/// Full-replace semantics: `save` overwrites whatever the identity had
/// stored. There is no versioning; last write wins.
pub trait RemoteStore<C: Collection> {
    /// Fetch the identity's stored collection. An identity that never saved
    /// returns an empty collection, not an error.
    async fn fetch(&self, identity: &Email) -> Result<C, StoreError>;

    /// Replace the identity's stored collection.
    async fn save(&self, identity: &Email, collection: &C) -> Result<(), StoreError>;
}

/// In-memory guest store backed by a shared map.
///
/// Used by tests and by anything that needs guest semantics without a
/// session layer. Clones share the underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryGuestStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryGuestStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, e.g. to simulate a returning guest.
    pub fn seed(&self, key: &str, value: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_owned(), value);
        }
    }

    /// Read a key synchronously (test helper).
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }
}

impl GuestStore for MemoryGuestStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        entries.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

/// In-memory remote store keyed by identity.
///
/// Clones share the underlying map, so a test can hand one clone to the
/// engine and inspect another.
#[derive(Debug, Clone, Default)]
pub struct MemoryRemoteStore<C> {
    documents: Arc<Mutex<HashMap<Email, C>>>,
}

impl<C: Collection> MemoryRemoteStore<C> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            documents: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Pre-populate an identity's collection.
    pub fn seed(&self, identity: Email, collection: C) {
        if let Ok(mut documents) = self.documents.lock() {
            documents.insert(identity, collection);
        }
    }

    /// Read an identity's stored collection (test helper).
    #[must_use]
    pub fn peek(&self, identity: &Email) -> Option<C> {
        self.documents.lock().ok()?.get(identity).cloned()
    }
}

impl<C: Collection> RemoteStore<C> for MemoryRemoteStore<C> {
    async fn fetch(&self, identity: &Email) -> Result<C, StoreError> {
        let documents = self
            .documents
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(documents.get(identity).cloned().unwrap_or_default())
    }

    async fn save(&self, identity: &Email, collection: &C) -> Result<(), StoreError> {
        let mut documents = self
            .documents
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        documents.insert(identity.clone(), collection.clone());
        Ok(())
    }
}
