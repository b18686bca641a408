//! Completion rules and per-system progress.

use crate::model::{Catalog, ComponentRecord, SystemId};
use crate::store::ProgressStore;

/// A record is complete once it has a photo and at least one note.
#[must_use]
pub fn is_complete(record: &ComponentRecord) -> bool {
    record.has_image() && record.has_any_note()
}

/// Percentage of a system's catalog components that are complete, rounded half up.
///
/// Returns 0 for a system with no components.
#[must_use]
pub fn progress_percent(system: SystemId, catalog: &Catalog, store: &ProgressStore) -> u8 {
    SystemProgress::compute(system, catalog, store).percent
}

/// Aggregated completion for one system, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemProgress {
    pub system: SystemId,
    pub total: usize,
    pub completed: usize,
    pub percent: u8,
}

impl SystemProgress {
    #[must_use]
    pub fn compute(system: SystemId, catalog: &Catalog, store: &ProgressStore) -> Self {
        let components = catalog.components(system);
        let completed = components
            .iter()
            .filter(|def| is_complete(&store.get(system, &def.component_id())))
            .count();
        Self {
            system,
            total: components.len(),
            completed,
            percent: rounded_percent(completed, components.len()),
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Progress for every system, in [`SystemId::ALL`] order.
#[must_use]
pub fn overview(catalog: &Catalog, store: &ProgressStore) -> Vec<SystemProgress> {
    SystemId::ALL
        .iter()
        .map(|system| SystemProgress::compute(*system, catalog, store))
        .collect()
}

// round(100 * part / whole) with halves rounded up, in integers.
fn rounded_percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let percent = (200 * part + whole) / (2 * whole);
    u8::try_from(percent.min(100)).unwrap_or(100)
}
