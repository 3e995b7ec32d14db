//! Link preview port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::media::LinkPreview;

/// Link preview errors
#[derive(Debug, Clone, Error)]
pub enum LinkPreviewError {
    #[error("Invalid URL: \"{0}\"")]
    InvalidUrl(String),

    #[error("Preview unavailable: {0}")]
    Unavailable(String),
}

/// Port for describing a URL before attaching it
#[async_trait]
pub trait LinkPreviewer: Send + Sync {
    /// Build a preview for `url`. Bare hosts are treated as https.
    async fn preview(&self, url: &str) -> Result<LinkPreview, LinkPreviewError>;
}
