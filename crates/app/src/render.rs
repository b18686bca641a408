//! Plain-text views of the catalog and the learner's records.

use std::io::{self, Write};

use workbook_core::model::{Catalog, ComponentDefinition, ComponentRecord, TextField};
use workbook_core::{ProgressStore, SystemProgress, is_complete};

pub fn summary_line(out: &mut impl Write, summary: &SystemProgress) -> io::Result<()> {
    writeln!(
        out,
        "{:<18} {:>3}%  ({}/{} complete)",
        summary.system.title(),
        summary.percent,
        summary.completed,
        summary.total
    )
}

pub fn system_listing(
    out: &mut impl Write,
    catalog: &Catalog,
    store: &ProgressStore,
    summary: &SystemProgress,
) -> io::Result<()> {
    summary_line(out, summary)?;
    for definition in catalog.components(summary.system) {
        let record = store.get(summary.system, &definition.component_id());
        let mark = if is_complete(&record) { "[x]" } else { "[ ]" };
        writeln!(
            out,
            "  {mark} {:<18} {:<28} {}",
            definition.id,
            definition.name,
            field_marks(&record)
        )?;
    }
    writeln!(out)
}

pub fn component_detail(
    out: &mut impl Write,
    definition: &ComponentDefinition,
    record: &ComponentRecord,
) -> io::Result<()> {
    writeln!(out, "{} ({})", definition.name, definition.id)?;
    match record.image() {
        Some(image) => writeln!(
            out,
            "  photo: {} ({} bytes encoded)",
            image.media_type().unwrap_or("unknown type"),
            image.encoded_len()
        )?,
        None => writeln!(out, "  photo: none")?,
    }
    for field in TextField::ALL {
        let value = record.text(field);
        writeln!(out, "  {}:", field.label())?;
        if value.is_empty() {
            writeln!(out, "    (empty) hint: {}", field.hint(&definition.hints))?;
        } else {
            writeln!(out, "    {value}")?;
        }
    }
    if record.auto_filled() {
        writeln!(out, "  auto-filled from reference text")?;
    }
    status_line(out, record)
}

pub fn status_line(out: &mut impl Write, record: &ComponentRecord) -> io::Result<()> {
    if is_complete(record) {
        writeln!(out, "status: complete")
    } else if record.has_image() {
        writeln!(out, "status: add at least one note to complete")
    } else {
        writeln!(out, "status: needs a photo and at least one note")
    }
}

fn field_marks(record: &ComponentRecord) -> String {
    let photo = if record.has_image() { "photo" } else { "-----" };
    let notes: Vec<&str> = TextField::ALL
        .iter()
        .map(|field| {
            let filled = !record.text(*field).is_empty();
            match (field, filled) {
                (TextField::VisualDescription, true) => "V",
                (TextField::Function, true) => "F",
                (TextField::Operation, true) => "O",
                (_, false) => "-",
            }
        })
        .collect();
    format!("{photo} {}", notes.concat())
}
