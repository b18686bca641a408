use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Contents of a named slot as last written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSlot {
    pub name: String,
    pub contents: String,
    pub saved_at: DateTime<Utc>,
}

/// Named key-value slots holding whole serialized documents.
///
/// Writes replace the previous contents in full; there are no partial updates.
#[async_trait]
pub trait ProgressSlotRepository: Send + Sync {
    /// Read a slot.
    ///
    /// Returns `Ok(None)` when the slot has never been written or was cleared.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn read_slot(&self, name: &str) -> Result<Option<StoredSlot>, StorageError>;

    /// Overwrite a slot with new contents.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the contents cannot be stored.
    async fn write_slot(
        &self,
        name: &str,
        contents: &str,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Remove a slot. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be updated.
    async fn clear_slot(&self, name: &str) -> Result<bool, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    slots: Arc<Mutex<HashMap<String, StoredSlot>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Seed a slot directly, bypassing the trait (useful for corrupt-data tests).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn put_raw(
        &self,
        name: &str,
        contents: impl Into<String>,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(
            name.to_string(),
            StoredSlot {
                name: name.to_string(),
                contents: contents.into(),
                saved_at,
            },
        );
        Ok(())
    }
}

#[async_trait]
impl ProgressSlotRepository for InMemoryRepository {
    async fn read_slot(&self, name: &str) -> Result<Option<StoredSlot>, StorageError> {
        let guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(name).cloned())
    }

    async fn write_slot(
        &self,
        name: &str,
        contents: &str,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        self.put_raw(name, contents, saved_at)
    }

    async fn clear_slot(&self, name: &str) -> Result<bool, StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.remove(name).is_some())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub slots: Arc<dyn ProgressSlotRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let slots: Arc<dyn ProgressSlotRepository> = Arc::new(InMemoryRepository::new());
        Self { slots }
    }
}
