use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::catalog::{ComponentDefinition, Hints};
use crate::model::image::{ImageData, deserialize_optional_image};
use crate::progress;

//
// ─── FIELDS ────────────────────────────────────────────────────────────────────
//

/// The three free-text notes a learner writes for a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    VisualDescription,
    Function,
    Operation,
}

impl TextField {
    pub const ALL: [TextField; 3] = [
        TextField::VisualDescription,
        TextField::Function,
        TextField::Operation,
    ];

    /// Field name in the persisted document.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            TextField::VisualDescription => "userVisualDescription",
            TextField::Function => "userFunction",
            TextField::Operation => "userOperation",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TextField::VisualDescription => "Visual Description",
            TextField::Function => "Function",
            TextField::Operation => "Operation",
        }
    }

    /// Catalog text copied in by auto-fill.
    #[must_use]
    pub fn reference_text(self, definition: &ComponentDefinition) -> &'static str {
        match self {
            TextField::VisualDescription => definition.visual_description,
            TextField::Function => definition.function,
            TextField::Operation => definition.operation,
        }
    }

    #[must_use]
    pub fn hint(self, hints: &Hints) -> &'static str {
        match self {
            TextField::VisualDescription => hints.visual_description,
            TextField::Function => hints.function,
            TextField::Operation => hints.operation,
        }
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown note field: {0}")]
pub struct UnknownFieldError(String);

impl FromStr for TextField {
    type Err = UnknownFieldError;

    /// Accepts both the short names used on the command line and the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visual" | "visual-description" | "userVisualDescription" => {
                Ok(TextField::VisualDescription)
            }
            "function" | "userFunction" => Ok(TextField::Function),
            "operation" | "userOperation" => Ok(TextField::Operation),
            other => Err(UnknownFieldError(other.to_string())),
        }
    }
}

/// A single-field change to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    /// Attach a photo, or `None` to remove it.
    Image(Option<ImageData>),
    Text(TextField, String),
}

impl FieldUpdate {
    #[must_use]
    pub fn text(field: TextField, value: impl Into<String>) -> Self {
        Self::Text(field, value.into())
    }
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// Learner input for one component.
///
/// `completed` is a cache of [`progress::is_complete`]; it is recomputed on
/// every write and whenever a record is read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PersistedRecord")]
pub struct ComponentRecord {
    image: Option<ImageData>,
    user_visual_description: String,
    user_function: String,
    user_operation: String,
    completed: bool,
    auto_filled: bool,
}

impl ComponentRecord {
    #[must_use]
    pub fn image(&self) -> Option<&ImageData> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    #[must_use]
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::VisualDescription => &self.user_visual_description,
            TextField::Function => &self.user_function,
            TextField::Operation => &self.user_operation,
        }
    }

    #[must_use]
    pub fn user_visual_description(&self) -> &str {
        &self.user_visual_description
    }

    #[must_use]
    pub fn user_function(&self) -> &str {
        &self.user_function
    }

    #[must_use]
    pub fn user_operation(&self) -> &str {
        &self.user_operation
    }

    /// Cached completion flag. Use [`progress::is_complete`] where correctness matters.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn auto_filled(&self) -> bool {
        self.auto_filled
    }

    /// True if any note field holds text. Whitespace counts as text.
    #[must_use]
    pub fn has_any_note(&self) -> bool {
        TextField::ALL.iter().any(|field| !self.text(*field).is_empty())
    }

    pub(crate) fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Image(image) => self.image = image,
            FieldUpdate::Text(field, value) => *self.text_mut(field) = value,
        }
        self.refresh_completed();
    }

    pub(crate) fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::VisualDescription => &mut self.user_visual_description,
            TextField::Function => &mut self.user_function,
            TextField::Operation => &mut self.user_operation,
        }
    }

    pub(crate) fn mark_auto_filled(&mut self) {
        self.auto_filled = true;
    }

    pub(crate) fn refresh_completed(&mut self) {
        self.completed = progress::is_complete(self);
    }
}

/// Lenient on-disk shape. Every field may be missing, and text fields may be `null`.
/// A stored `completed` flag is ignored.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct PersistedRecord {
    #[serde(deserialize_with = "deserialize_optional_image")]
    image: Option<ImageData>,
    #[serde(deserialize_with = "deserialize_text")]
    user_visual_description: String,
    #[serde(deserialize_with = "deserialize_text")]
    user_function: String,
    #[serde(deserialize_with = "deserialize_text")]
    user_operation: String,
    #[serde(deserialize_with = "deserialize_flag")]
    auto_filled: bool,
}

impl From<PersistedRecord> for ComponentRecord {
    fn from(raw: PersistedRecord) -> Self {
        let mut record = ComponentRecord {
            image: raw.image,
            user_visual_description: raw.user_visual_description,
            user_function: raw.user_function,
            user_operation: raw.user_operation,
            completed: false,
            auto_filled: raw.auto_filled,
        };
        record.refresh_completed();
        record
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default())
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<bool> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default())
}
