mod catalog;
mod ids;
mod image;
mod record;

pub use catalog::{Catalog, ComponentDefinition, Hints};
pub use ids::{ComponentId, ComponentKey, ParseIdError, SystemId};
pub use image::{ImageData, ImageError, media_type_for_path};
pub use record::{ComponentRecord, FieldUpdate, TextField, UnknownFieldError};
