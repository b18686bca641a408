use std::sync::Arc;

use storage::repository::Storage;
use workbook_core::model::Catalog;

use crate::Clock;
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;

/// Assembles app-facing services over a storage backend.
#[derive(Clone)]
pub struct AppServices {
    progress: Arc<ProgressService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or loading saved
    /// progress fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, clock).await
    }

    /// Build services over an in-memory backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if loading progress fails.
    pub async fn new_in_memory(clock: Clock) -> Result<Self, AppServicesError> {
        Self::from_storage(&Storage::in_memory(), clock).await
    }

    async fn from_storage(storage: &Storage, clock: Clock) -> Result<Self, AppServicesError> {
        let progress =
            ProgressService::load(clock, Catalog::builtin(), Arc::clone(&storage.slots)).await?;
        Ok(Self {
            progress: Arc::new(progress),
        })
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}
