use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use storage::repository::ProgressSlotRepository;
use tokio::sync::Mutex;
use workbook_core::model::{
    Catalog, ComponentId, ComponentKey, ComponentRecord, FieldUpdate, ImageData, SystemId,
    TextField,
};
use workbook_core::snapshot::{self, Loaded, PROGRESS_SLOT};
use workbook_core::{Clock, ProgressStore, SystemProgress, progress};

use crate::confirmation::ResetConfirmation;
use crate::error::ProgressServiceError;
use crate::image_source::{FileImageSource, ImageSource};

/// Owns the learner's progress and keeps the persisted slot in step with it.
///
/// Every command validates its target against the catalog, computes the next
/// store, writes it to the slot, and only then makes it visible. Commands are
/// serialized, so readers never see a half-applied change.
pub struct ProgressService {
    clock: Clock,
    catalog: Catalog,
    slots: Arc<dyn ProgressSlotRepository>,
    slot_name: String,
    images: Arc<dyn ImageSource>,
    store: Mutex<ProgressStore>,
    image_reads: Mutex<HashMap<ComponentKey, Arc<Mutex<()>>>>,
}

impl ProgressService {
    /// Load saved progress from the default slot.
    ///
    /// Missing or unreadable documents start an empty store.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the backend itself fails.
    pub async fn load(
        clock: Clock,
        catalog: Catalog,
        slots: Arc<dyn ProgressSlotRepository>,
    ) -> Result<Self, ProgressServiceError> {
        Self::load_from_slot(clock, catalog, slots, PROGRESS_SLOT).await
    }

    /// Like [`load`](Self::load), reading from a named slot.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the backend itself fails.
    pub async fn load_from_slot(
        clock: Clock,
        catalog: Catalog,
        slots: Arc<dyn ProgressSlotRepository>,
        slot_name: &str,
    ) -> Result<Self, ProgressServiceError> {
        let raw = slots.read_slot(slot_name).await?;
        let store = match Loaded::from_slot(raw.as_ref().map(|slot| slot.contents.as_str())) {
            Loaded::Missing => {
                tracing::debug!(slot = slot_name, "no saved progress; starting empty");
                ProgressStore::new()
            }
            Loaded::Corrupt(err) => {
                tracing::warn!(slot = slot_name, error = %err, "saved progress unreadable; starting empty");
                ProgressStore::new()
            }
            Loaded::Restored(store) => {
                tracing::debug!(slot = slot_name, records = store.len(), "restored progress");
                store
            }
        };

        Ok(Self {
            clock,
            catalog,
            slots,
            slot_name: slot_name.to_string(),
            images: Arc::new(FileImageSource),
            store: Mutex::new(store),
            image_reads: Mutex::new(HashMap::new()),
        })
    }

    /// Read attached photos through `images` instead of the filesystem.
    #[must_use]
    pub fn with_image_source(mut self, images: Arc<dyn ImageSource>) -> Self {
        self.images = images;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current record for a component (empty if never touched).
    pub async fn get(&self, system: SystemId, component: &ComponentId) -> ComponentRecord {
        self.store.lock().await.get(system, component)
    }

    pub async fn is_complete(&self, system: SystemId, component: &ComponentId) -> bool {
        progress::is_complete(&self.get(system, component).await)
    }

    pub async fn progress(&self, system: SystemId) -> SystemProgress {
        let store = self.store.lock().await;
        SystemProgress::compute(system, &self.catalog, &store)
    }

    pub async fn overview(&self) -> Vec<SystemProgress> {
        let store = self.store.lock().await;
        progress::overview(&self.catalog, &store)
    }

    /// A copy of the whole store.
    pub async fn snapshot(&self) -> ProgressStore {
        self.store.lock().await.clone()
    }

    /// Replace one field of a record and persist.
    ///
    /// # Errors
    ///
    /// Returns `UnknownComponent` for ids outside the catalog, or a storage /
    /// snapshot error if the save fails (the in-memory store is then unchanged).
    pub async fn update(
        &self,
        system: SystemId,
        component: &ComponentId,
        update: FieldUpdate,
    ) -> Result<ComponentRecord, ProgressServiceError> {
        self.ensure_known(system, component)?;
        self.commit(system, component, |store| store.update(system, component, update))
            .await
    }

    /// Write one of the note fields.
    ///
    /// # Errors
    ///
    /// See [`update`](Self::update).
    pub async fn set_text(
        &self,
        system: SystemId,
        component: &ComponentId,
        field: TextField,
        value: impl Into<String>,
    ) -> Result<ComponentRecord, ProgressServiceError> {
        self.update(system, component, FieldUpdate::text(field, value))
            .await
    }

    /// Drop the photo; the record becomes incomplete.
    ///
    /// # Errors
    ///
    /// See [`update`](Self::update).
    pub async fn remove_image(
        &self,
        system: SystemId,
        component: &ComponentId,
    ) -> Result<ComponentRecord, ProgressServiceError> {
        self.update(system, component, FieldUpdate::Image(None)).await
    }

    /// Read an image file and attach it as an embedded data URL.
    ///
    /// Reads for the same component run one at a time in call order. The
    /// previous image stays visible until the read finishes. A failed read
    /// leaves the record as it was.
    ///
    /// # Errors
    ///
    /// Returns `UnknownComponent`, `Image` if the file cannot be read, or a
    /// storage / snapshot error if the save fails.
    pub async fn attach_image_file(
        &self,
        system: SystemId,
        component: &ComponentId,
        path: &Path,
    ) -> Result<ComponentRecord, ProgressServiceError> {
        self.ensure_known(system, component)?;

        let gate = self
            .image_gate(ComponentKey::new(system, component.clone()))
            .await;
        let _reading = gate.lock().await;

        let bytes = match self.images.read(path).await {
            Ok(bytes) => bytes,
            Err(source) => {
                tracing::warn!(
                    %system,
                    %component,
                    path = %path.display(),
                    error = %source,
                    "image read failed; record unchanged"
                );
                return Err(ProgressServiceError::Image {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let image = ImageData::encode_file(path, &bytes);
        tracing::debug!(%system, %component, bytes = bytes.len(), "image read");

        self.update(system, component, FieldUpdate::Image(Some(image)))
            .await
    }

    /// Copy catalog text into empty note fields.
    ///
    /// # Errors
    ///
    /// Returns `UnknownComponent`, `ImageRequired` when the record has no
    /// photo yet, or a storage / snapshot error if the save fails.
    pub async fn auto_fill(
        &self,
        system: SystemId,
        component: &ComponentId,
    ) -> Result<ComponentRecord, ProgressServiceError> {
        self.ensure_known(system, component)?;
        let mut store = self.store.lock().await;
        if !store.get(system, component).has_image() {
            return Err(ProgressServiceError::ImageRequired {
                component: component.clone(),
            });
        }
        let next = workbook_core::auto_fill(system, component, &self.catalog, &store);
        self.save(&next).await?;
        *store = next;
        Ok(store.get(system, component))
    }

    /// Pretty-printed JSON of the whole store.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Snapshot` if encoding fails.
    pub async fn export_snapshot(&self) -> Result<String, ProgressServiceError> {
        let store = self.store.lock().await;
        Ok(snapshot::export_snapshot(&store)?)
    }

    /// Write the export document to `path`.
    ///
    /// # Errors
    ///
    /// Returns `Snapshot` if encoding fails or `Export` if the file cannot be written.
    pub async fn export_to_file(&self, path: &Path) -> Result<PathBuf, ProgressServiceError> {
        let document = self.export_snapshot().await?;
        tokio::fs::write(path, document.as_bytes())
            .await
            .map_err(|source| ProgressServiceError::Export {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!(path = %path.display(), bytes = document.len(), "exported progress");
        Ok(path.to_path_buf())
    }

    /// Forget all progress and clear the persisted slot.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the slot cannot be cleared;
    /// the in-memory store is then left as it was.
    pub async fn reset(&self, _confirmed: ResetConfirmation) -> Result<(), ProgressServiceError> {
        let mut store = self.store.lock().await;
        let removed = self.slots.clear_slot(&self.slot_name).await?;
        tracing::info!(slot = %self.slot_name, records = store.len(), removed, "progress reset");
        *store = store.reset();
        Ok(())
    }

    fn ensure_known(
        &self,
        system: SystemId,
        component: &ComponentId,
    ) -> Result<(), ProgressServiceError> {
        if self.catalog.contains(system, component) {
            Ok(())
        } else {
            Err(ProgressServiceError::UnknownComponent {
                system,
                component: component.clone(),
            })
        }
    }

    async fn commit(
        &self,
        system: SystemId,
        component: &ComponentId,
        change: impl FnOnce(&ProgressStore) -> ProgressStore,
    ) -> Result<ComponentRecord, ProgressServiceError> {
        let mut store = self.store.lock().await;
        let next = change(&store);
        self.save(&next).await?;
        *store = next;
        Ok(store.get(system, component))
    }

    async fn save(&self, store: &ProgressStore) -> Result<(), ProgressServiceError> {
        let encoded = snapshot::encode(store)?;
        self.slots
            .write_slot(&self.slot_name, &encoded, self.clock.now())
            .await?;
        Ok(())
    }

    async fn image_gate(&self, key: ComponentKey) -> Arc<Mutex<()>> {
        let mut gates = self.image_reads.lock().await;
        Arc::clone(gates.entry(key).or_default())
    }
}
