use crate::model::{Catalog, ComponentId, SystemId, TextField};
use crate::store::ProgressStore;

/// Fill empty note fields from the catalog's reference text.
///
/// Non-empty fields (including whitespace-only ones) are kept as written.
/// The record is flagged `autoFilled` even when nothing was copied. An id
/// that is not in the catalog for `system` leaves the store unchanged.
///
/// Image presence is not checked here; callers exposing this to a learner
/// should require a photo first.
#[must_use]
pub fn auto_fill(
    system: SystemId,
    component: &ComponentId,
    catalog: &Catalog,
    store: &ProgressStore,
) -> ProgressStore {
    let Some(definition) = catalog.definition(system, component) else {
        return store.clone();
    };

    store.with_record(system, component, |record| {
        for field in TextField::ALL {
            let value = record.text_mut(field);
            if value.is_empty() {
                *value = field.reference_text(definition).to_string();
            }
        }
        record.mark_auto_filled();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldUpdate, ImageData};
    use crate::progress::is_complete;
    use pretty_assertions::assert_eq;

    fn brake_disc() -> ComponentId {
        ComponentId::new("brake-disc")
    }

    #[test]
    fn fills_only_empty_fields() {
        let catalog = Catalog::builtin();
        let store = ProgressStore::new()
            .update(
                SystemId::Disc,
                &brake_disc(),
                FieldUpdate::Image(Some(ImageData::encode("image/png", b"x"))),
            )
            .update(
                SystemId::Disc,
                &brake_disc(),
                FieldUpdate::text(TextField::Function, "it stops the car"),
            );

        let filled = auto_fill(SystemId::Disc, &brake_disc(), &catalog, &store);
        let record = filled.get(SystemId::Disc, &brake_disc());
        let def = catalog.definition(SystemId::Disc, &brake_disc()).unwrap();

        assert_eq!(record.user_visual_description(), def.visual_description);
        assert_eq!(record.user_operation(), def.operation);
        assert_eq!(record.user_function(), "it stops the car");
        assert!(record.auto_filled());
        assert!(record.completed());
    }

    #[test]
    fn whitespace_is_not_overwritten() {
        let catalog = Catalog::builtin();
        let store = ProgressStore::new().update(
            SystemId::Disc,
            &brake_disc(),
            FieldUpdate::text(TextField::Operation, "   "),
        );
        let record = auto_fill(SystemId::Disc, &brake_disc(), &catalog, &store)
            .get(SystemId::Disc, &brake_disc());
        assert_eq!(record.user_operation(), "   ");
    }

    #[test]
    fn flags_record_even_when_nothing_changes() {
        let catalog = Catalog::builtin();
        let mut store = ProgressStore::new();
        for field in TextField::ALL {
            store = store.update(SystemId::Disc, &brake_disc(), FieldUpdate::text(field, "mine"));
        }
        let record = auto_fill(SystemId::Disc, &brake_disc(), &catalog, &store)
            .get(SystemId::Disc, &brake_disc());
        for field in TextField::ALL {
            assert_eq!(record.text(field), "mine");
        }
        assert!(record.auto_filled());
    }

    #[test]
    fn without_image_record_stays_incomplete() {
        let catalog = Catalog::builtin();
        let record = auto_fill(SystemId::Drum, &ComponentId::new("adjuster"), &catalog, &ProgressStore::new())
            .get(SystemId::Drum, &ComponentId::new("adjuster"));
        assert!(record.has_any_note());
        assert!(!is_complete(&record));
        assert!(!record.completed());
    }

    #[test]
    fn unknown_component_is_a_no_op() {
        let catalog = Catalog::builtin();
        let store = ProgressStore::new();
        let out = auto_fill(SystemId::Disc, &ComponentId::new("adjuster"), &catalog, &store);
        assert_eq!(out, store);
    }
}
