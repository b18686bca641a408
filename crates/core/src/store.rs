//! The keyed collection of learner records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{ComponentId, ComponentKey, ComponentRecord, FieldUpdate, SystemId};

/// Mapping from composite key to record.
///
/// Records only exist for components the learner has touched; [`get`](Self::get)
/// returns an empty record for everything else. Updates are copy-on-write and
/// leave `self` untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressStore {
    records: BTreeMap<ComponentKey, ComponentRecord>,
}

impl ProgressStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored record, or the default empty record if none exists.
    #[must_use]
    pub fn get(&self, system: SystemId, component: &ComponentId) -> ComponentRecord {
        self.record(&ComponentKey::new(system, component.clone()))
            .cloned()
            .unwrap_or_default()
    }

    /// Stored record by key, without the default fallback.
    #[must_use]
    pub fn record(&self, key: &ComponentKey) -> Option<&ComponentRecord> {
        self.records.get(key)
    }

    /// Returns a new store with one field of one record replaced.
    #[must_use]
    pub fn update(&self, system: SystemId, component: &ComponentId, update: FieldUpdate) -> Self {
        self.with_record(system, component, |record| record.apply(update))
    }

    /// Returns a new store where the addressed record has been passed through `edit`.
    ///
    /// `completed` is recomputed after `edit` runs, whatever it did.
    #[must_use]
    pub(crate) fn with_record(
        &self,
        system: SystemId,
        component: &ComponentId,
        edit: impl FnOnce(&mut ComponentRecord),
    ) -> Self {
        let key = ComponentKey::new(system, component.clone());
        let mut record = self.records.get(&key).cloned().unwrap_or_default();
        edit(&mut record);
        record.refresh_completed();

        let mut next = self.clone();
        next.records.insert(key, record);
        next
    }

    /// An empty store.
    #[must_use]
    pub fn reset(&self) -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}
