use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;
use thiserror::Error;
use url::Url;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImageError {
    #[error("image data cannot be empty")]
    Empty,

    #[error("image must be an embedded data URL")]
    NotDataUrl,
}

//
// ─── IMAGE DATA ────────────────────────────────────────────────────────────────
//

/// A photo embedded directly in a record as a `data:` URL.
///
/// No size limit and no re-encoding: the bytes are stored as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData(String);

impl ImageData {
    /// Encode raw file bytes as a base64 data URL.
    #[must_use]
    pub fn encode(media_type: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{media_type};base64,{}", STANDARD.encode(bytes)))
    }

    /// Encode bytes read from `path`, inferring the media type from its extension.
    #[must_use]
    pub fn encode_file(path: &Path, bytes: &[u8]) -> Self {
        Self::encode(media_type_for_path(path), bytes)
    }

    /// Accept an already-encoded data URL.
    ///
    /// # Errors
    ///
    /// Returns `ImageError::Empty` for a blank string and
    /// `ImageError::NotDataUrl` if the value is not a `data:` URL.
    pub fn from_data_url(raw: impl Into<String>) -> Result<Self, ImageError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ImageError::Empty);
        }
        match Url::parse(&raw) {
            Ok(url) if url.scheme() == "data" => Ok(Self(raw)),
            _ => Err(ImageError::NotDataUrl),
        }
    }

    /// Rehydrate a stored value without validation. Empty strings mean "no image".
    #[must_use]
    pub fn from_persisted(raw: String) -> Option<Self> {
        if raw.is_empty() { None } else { Some(Self(raw)) }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The declared media type, e.g. `image/png`, if the value carries one.
    #[must_use]
    pub fn media_type(&self) -> Option<&str> {
        let rest = self.0.strip_prefix("data:")?;
        let end = rest.find([';', ','])?;
        let media_type = &rest[..end];
        (!media_type.is_empty()).then_some(media_type)
    }

    /// Length of the encoded value in bytes.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        self.0.len()
    }
}

/// Media type guessed from a file extension.
#[must_use]
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

impl Serialize for ImageData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ImageData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self(raw))
    }
}

/// Reads `null`, a missing field, or `""` as no image.
pub(crate) fn deserialize_optional_image<'de, D>(
    deserializer: D,
) -> Result<Option<ImageData>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(ImageData::from_persisted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_builds_data_url() {
        let image = ImageData::encode("image/png", b"abc");
        assert_eq!(image.as_str(), "data:image/png;base64,YWJj");
        assert_eq!(image.media_type(), Some("image/png"));
    }

    #[test]
    fn encode_file_uses_extension() {
        let image = ImageData::encode_file(Path::new("photos/Caliper.JPG"), b"x");
        assert_eq!(image.media_type(), Some("image/jpeg"));
    }

    #[test]
    fn unknown_extension_falls_back_to_octet_stream() {
        assert_eq!(
            media_type_for_path(Path::new("notes.txt")),
            "application/octet-stream"
        );
        assert_eq!(
            media_type_for_path(Path::new("no_extension")),
            "application/octet-stream"
        );
    }

    #[test]
    fn from_data_url_validates_scheme() {
        assert!(ImageData::from_data_url("data:image/png;base64,AAAA").is_ok());
        assert_eq!(
            ImageData::from_data_url("https://example.com/a.png"),
            Err(ImageError::NotDataUrl)
        );
        assert_eq!(ImageData::from_data_url("   "), Err(ImageError::Empty));
    }

    #[test]
    fn persisted_empty_string_is_no_image() {
        assert_eq!(ImageData::from_persisted(String::new()), None);
        assert!(ImageData::from_persisted("data:,x".into()).is_some());
    }

    #[test]
    fn media_type_absent_for_bare_data_url() {
        let image = ImageData::from_persisted("data:,hello".into()).unwrap();
        assert_eq!(image.media_type(), None);
    }
}
