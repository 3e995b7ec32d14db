//! Media attachment entity

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::InvalidMediaItem;

/// Document MIME types accepted as attachments
pub const DOCUMENT_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Kind of attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Link,
    Document,
    Voice,
}

impl MediaKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Link => "link",
            Self::Document => "document",
            Self::Voice => "voice",
        }
    }

    /// Whether a file with this MIME type may be attached as this kind
    pub fn accepts_mime(&self, mime: &str) -> bool {
        let mime = mime.trim().to_ascii_lowercase();
        match self {
            Self::Image => mime.starts_with("image/"),
            Self::Document => DOCUMENT_MIME_TYPES.contains(&mime.as_str()),
            Self::Voice => mime.starts_with("audio/"),
            Self::Link => false,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Preview metadata for a link attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPreview {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    pub url: String,
}

/// Wire shape of a media item, validated into [`MediaItem`]
#[derive(Debug, Deserialize)]
struct RawMediaItem {
    id: Uuid,
    #[serde(rename = "type")]
    kind: MediaKind,
    url: String,
    name: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    duration: Option<u64>,
    #[serde(default)]
    preview: Option<LinkPreview>,
}

/// A saved attachment.
///
/// `duration` is present exactly for voice items and `preview` only for
/// links; every constructor and deserialization enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMediaItem")]
pub struct MediaItem {
    id: Uuid,
    #[serde(rename = "type")]
    kind: MediaKind,
    #[serde(rename = "url")]
    reference: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<LinkPreview>,
}

impl MediaItem {
    fn validated(raw: RawMediaItem) -> Result<Self, InvalidMediaItem> {
        if raw.url.trim().is_empty() {
            return Err(InvalidMediaItem::EmptyReference);
        }
        match (raw.kind, raw.duration) {
            (MediaKind::Voice, None) => return Err(InvalidMediaItem::MissingDuration),
            (kind, Some(_)) if kind != MediaKind::Voice => {
                return Err(InvalidMediaItem::UnexpectedDuration {
                    kind: kind.to_string(),
                })
            }
            _ => {}
        }
        if raw.kind != MediaKind::Link && raw.preview.is_some() {
            return Err(InvalidMediaItem::UnexpectedPreview {
                kind: raw.kind.to_string(),
            });
        }

        Ok(Self {
            id: raw.id,
            kind: raw.kind,
            reference: raw.url,
            name: raw.name,
            size: raw.size,
            duration: raw.duration,
            preview: raw.preview,
        })
    }

    fn build(
        kind: MediaKind,
        reference: impl Into<String>,
        name: impl Into<String>,
        size: Option<u64>,
        duration: Option<u64>,
        preview: Option<LinkPreview>,
    ) -> Result<Self, InvalidMediaItem> {
        Self::validated(RawMediaItem {
            id: Uuid::new_v4(),
            kind,
            url: reference.into(),
            name: name.into(),
            size,
            duration,
            preview,
        })
    }

    /// Image stored under `reference`
    pub fn image(
        reference: impl Into<String>,
        name: impl Into<String>,
        size: u64,
    ) -> Result<Self, InvalidMediaItem> {
        Self::build(MediaKind::Image, reference, name, Some(size), None, None)
    }

    /// Document stored under `reference`
    pub fn document(
        reference: impl Into<String>,
        name: impl Into<String>,
        size: u64,
    ) -> Result<Self, InvalidMediaItem> {
        Self::build(MediaKind::Document, reference, name, Some(size), None, None)
    }

    /// Voice note stored under `reference`, `duration_secs` long
    pub fn voice(
        reference: impl Into<String>,
        name: impl Into<String>,
        size: u64,
        duration_secs: u64,
    ) -> Result<Self, InvalidMediaItem> {
        Self::build(
            MediaKind::Voice,
            reference,
            name,
            Some(size),
            Some(duration_secs),
            None,
        )
    }

    /// Link to `url`, named after the preview title
    pub fn link(url: impl Into<String>, preview: LinkPreview) -> Result<Self, InvalidMediaItem> {
        let name = preview.title.clone();
        Self::build(MediaKind::Link, url, name, None, None, Some(preview))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Opaque storage id, or the URL for links
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn duration(&self) -> Option<u64> {
        self.duration
    }

    pub fn preview(&self) -> Option<&LinkPreview> {
        self.preview.as_ref()
    }
}

impl TryFrom<RawMediaItem> for MediaItem {
    type Error = InvalidMediaItem;

    fn try_from(raw: RawMediaItem) -> Result<Self, Self::Error> {
        Self::validated(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preview() -> LinkPreview {
        LinkPreview {
            title: "Link to example.com".to_string(),
            description: None,
            favicon: None,
            url: "https://example.com".to_string(),
        }
    }

    #[test]
    fn voice_carries_duration() {
        let item = MediaItem::voice("abc", "note.flac", 10, 3).unwrap();
        assert_eq!(item.kind(), MediaKind::Voice);
        assert_eq!(item.duration(), Some(3));
        assert_eq!(item.size(), Some(10));
        assert!(item.preview().is_none());
    }

    #[test]
    fn link_takes_name_from_preview() {
        let item = MediaItem::link("example.com", preview()).unwrap();
        assert_eq!(item.name(), "Link to example.com");
        assert_eq!(item.reference(), "example.com");
        assert!(item.duration().is_none());
        assert!(item.size().is_none());
    }

    #[test]
    fn empty_reference_is_rejected() {
        let err = MediaItem::image("  ", "a.png", 1).unwrap_err();
        assert_eq!(err, InvalidMediaItem::EmptyReference);
    }

    #[test]
    fn ids_are_unique() {
        let a = MediaItem::image("ref", "a.png", 1).unwrap();
        let b = MediaItem::image("ref", "a.png", 1).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let item = MediaItem::voice("abc", "note.flac", 10, 3).unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "voice");
        assert_eq!(json["url"], "abc");
        assert_eq!(json["duration"], 3);
        assert!(json.get("preview").is_none());
    }

    #[test]
    fn deserialize_rejects_duration_on_image() {
        let json = r#"{"id":"6f1c7c1e-2f1a-4d55-9a3e-0d7c2b1f9a10","type":"image","url":"x","name":"a.png","duration":4}"#;
        let err = serde_json::from_str::<MediaItem>(json).unwrap_err();
        assert!(err.to_string().contains("duration"));
    }

    #[test]
    fn deserialize_rejects_voice_without_duration() {
        let json = r#"{"id":"6f1c7c1e-2f1a-4d55-9a3e-0d7c2b1f9a10","type":"voice","url":"x","name":"a.flac"}"#;
        assert!(serde_json::from_str::<MediaItem>(json).is_err());
    }

    #[test]
    fn deserialize_rejects_preview_on_document() {
        let json = r#"{"id":"6f1c7c1e-2f1a-4d55-9a3e-0d7c2b1f9a10","type":"document","url":"x","name":"a.pdf","preview":{"title":"t","url":"u"}}"#;
        assert!(serde_json::from_str::<MediaItem>(json).is_err());
    }

    #[test]
    fn accepts_mime_per_kind() {
        assert!(MediaKind::Image.accepts_mime("image/png"));
        assert!(!MediaKind::Image.accepts_mime("application/pdf"));
        assert!(MediaKind::Document.accepts_mime("application/pdf"));
        assert!(MediaKind::Document.accepts_mime("APPLICATION/MSWORD"));
        assert!(!MediaKind::Document.accepts_mime("text/plain"));
        assert!(!MediaKind::Link.accepts_mime("text/html"));
    }
}
