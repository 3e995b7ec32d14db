//! Media storage port interface

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Media not found: {0}")]
    NotFound(String),

    #[error("Failed to write media: {0}")]
    WriteFailed(String),

    #[error("Failed to read media: {0}")]
    ReadFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Storage rejected the credentials")]
    Unauthorized,

    #[error("Storage is not configured: {0}")]
    NotConfigured(String),
}

/// Port for durable byte-blob storage.
///
/// Callers never inspect storage internals; they keep the returned reference
/// id and resolve it through the same store later.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persist `bytes` and return a stable reference id
    async fn store(
        &self,
        bytes: &[u8],
        mime_type: &str,
        suggested_name: &str,
    ) -> Result<String, StorageError>;

    /// Fetch the bytes behind a reference id
    async fn load(&self, reference: &str) -> Result<Vec<u8>, StorageError>;

    /// Remove the bytes behind a reference id
    async fn delete(&self, reference: &str) -> Result<(), StorageError>;
}

#[async_trait]
impl<T: MediaStore + ?Sized> MediaStore for Box<T> {
    async fn store(
        &self,
        bytes: &[u8],
        mime_type: &str,
        suggested_name: &str,
    ) -> Result<String, StorageError> {
        (**self).store(bytes, mime_type, suggested_name).await
    }

    async fn load(&self, reference: &str) -> Result<Vec<u8>, StorageError> {
        (**self).load(reference).await
    }

    async fn delete(&self, reference: &str) -> Result<(), StorageError> {
        (**self).delete(reference).await
    }
}

#[async_trait]
impl<T: MediaStore + ?Sized> MediaStore for Arc<T> {
    async fn store(
        &self,
        bytes: &[u8],
        mime_type: &str,
        suggested_name: &str,
    ) -> Result<String, StorageError> {
        (**self).store(bytes, mime_type, suggested_name).await
    }

    async fn load(&self, reference: &str) -> Result<Vec<u8>, StorageError> {
        (**self).load(reference).await
    }

    async fn delete(&self, reference: &str) -> Result<(), StorageError> {
        (**self).delete(reference).await
    }
}
