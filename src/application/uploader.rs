//! Media attachment use case

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::error::InvalidMediaItem;
use crate::domain::media::{MediaItem, MediaKind};

use super::ports::{LinkPreviewError, LinkPreviewer, MediaStore, StorageError};

/// Errors from the uploader use case
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Unsupported file type for \"{name}\": {mime}")]
    UnsupportedType { name: String, mime: String },

    #[error("Invalid URL: \"{0}\"")]
    InvalidUrl(String),

    #[error("Upload failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Link preview failed: {0}")]
    Preview(LinkPreviewError),

    #[error("Invalid media item: {0}")]
    InvalidMedia(#[from] InvalidMediaItem),

    #[error("Failed to read {path}: {message}")]
    ReadFailed { path: String, message: String },
}

impl From<LinkPreviewError> for UploadError {
    fn from(err: LinkPreviewError) -> Self {
        match err {
            LinkPreviewError::InvalidUrl(url) => Self::InvalidUrl(url),
            other => Self::Preview(other),
        }
    }
}

/// Guess a MIME type from a file extension
pub fn mime_from_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => return None,
    };
    Some(mime)
}

/// Attaches images, documents and links through injected collaborators
pub struct MediaUploader<S, L>
where
    S: MediaStore,
    L: LinkPreviewer,
{
    store: S,
    previewer: L,
}

impl<S, L> MediaUploader<S, L>
where
    S: MediaStore,
    L: LinkPreviewer,
{
    pub fn new(store: S, previewer: L) -> Self {
        Self { store, previewer }
    }

    /// Store an image and return its media item
    pub async fn add_image(
        &self,
        bytes: &[u8],
        name: &str,
        mime_type: &str,
    ) -> Result<MediaItem, UploadError> {
        self.check(MediaKind::Image, name, mime_type)?;
        let reference = self.store.store(bytes, mime_type, name).await?;
        info!(reference = %reference, name, "image attached");
        Ok(MediaItem::image(reference, name, bytes.len() as u64)?)
    }

    /// Store a PDF or Word document and return its media item
    pub async fn add_document(
        &self,
        bytes: &[u8],
        name: &str,
        mime_type: &str,
    ) -> Result<MediaItem, UploadError> {
        self.check(MediaKind::Document, name, mime_type)?;
        let reference = self.store.store(bytes, mime_type, name).await?;
        info!(reference = %reference, name, "document attached");
        Ok(MediaItem::document(reference, name, bytes.len() as u64)?)
    }

    fn check(&self, kind: MediaKind, name: &str, mime_type: &str) -> Result<(), UploadError> {
        if kind.accepts_mime(mime_type) {
            Ok(())
        } else {
            Err(UploadError::UnsupportedType {
                name: name.to_string(),
                mime: mime_type.to_string(),
            })
        }
    }

    /// Read a file from disk and attach it as an image or document
    pub async fn add_file(&self, path: &Path) -> Result<MediaItem, UploadError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mime = mime_from_path(path).ok_or_else(|| UploadError::UnsupportedType {
            name: name.clone(),
            mime: "unknown".to_string(),
        })?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| UploadError::ReadFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        debug!(path = %path.display(), mime, size = bytes.len(), "file read");

        if MediaKind::Image.accepts_mime(mime) {
            self.add_image(&bytes, &name, mime).await
        } else {
            self.add_document(&bytes, &name, mime).await
        }
    }

    /// Attach a link, named after its preview title
    pub async fn add_link(&self, url: &str) -> Result<MediaItem, UploadError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(UploadError::InvalidUrl(url.to_string()));
        }

        let preview = self.previewer.preview(url).await?;
        info!(url, title = %preview.title, "link attached");
        Ok(MediaItem::link(url, preview)?)
    }
}
