//! JSON documents for the persisted slot and the export file.

use thiserror::Error;

use crate::store::ProgressStore;

/// Name of the key-value slot holding the saved store.
pub const PROGRESS_SLOT: &str = "brakeComponentsProgress";

/// Default file name for exported progress.
pub const EXPORT_FILE_NAME: &str = "brake-components-progress.json";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("failed to encode progress: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode progress: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Compact encoding written to the persisted slot.
///
/// # Errors
///
/// Returns `SnapshotError::Encode` if serialization fails.
pub fn encode(store: &ProgressStore) -> Result<String, SnapshotError> {
    serde_json::to_string(store).map_err(SnapshotError::Encode)
}

/// Pretty-printed export of the whole store, images included.
///
/// # Errors
///
/// Returns `SnapshotError::Encode` if serialization fails.
pub fn export_snapshot(store: &ProgressStore) -> Result<String, SnapshotError> {
    serde_json::to_string_pretty(store).map_err(SnapshotError::Encode)
}

/// Strict decode of a saved or exported document.
///
/// # Errors
///
/// Returns `SnapshotError::Decode` for malformed JSON, unknown systems in
/// keys, or values of the wrong shape.
pub fn decode(raw: &str) -> Result<ProgressStore, SnapshotError> {
    serde_json::from_str(raw).map_err(SnapshotError::Decode)
}

/// Outcome of reading a slot that may be missing or damaged.
#[derive(Debug)]
pub enum Loaded {
    Missing,
    Restored(ProgressStore),
    Corrupt(SnapshotError),
}

impl Loaded {
    /// Classify raw slot contents. A blank slot counts as missing.
    #[must_use]
    pub fn from_slot(raw: Option<&str>) -> Self {
        match raw {
            None => Loaded::Missing,
            Some(text) if text.trim().is_empty() => Loaded::Missing,
            Some(text) => match decode(text) {
                Ok(store) => Loaded::Restored(store),
                Err(err) => Loaded::Corrupt(err),
            },
        }
    }

    /// The restored store, or an empty one.
    #[must_use]
    pub fn into_store(self) -> ProgressStore {
        match self {
            Loaded::Restored(store) => store,
            Loaded::Missing | Loaded::Corrupt(_) => ProgressStore::new(),
        }
    }
}
