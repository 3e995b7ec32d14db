//! Media domain module

mod media_item;

pub use media_item::{LinkPreview, MediaItem, MediaKind, DOCUMENT_MIME_TYPES};
