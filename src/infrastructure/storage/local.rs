//! Content-addressed media store on the local filesystem
//!
//! Layout: `<root>/<aa>/<digest>` holds the bytes and `<root>/<aa>/<digest>.json`
//! the metadata, where `digest` is the SHA-256 hex of the bytes and `aa` its
//! first two characters.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::application::ports::{MediaStore, StorageError};

const SIDECAR_EXT: &str = "json";

/// Metadata written next to every stored blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMedia {
    pub id: String,
    pub name: String,
    pub mime: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

/// SHA-256 of `bytes` as lowercase hex
pub fn content_digest(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

fn is_digest(id: &str) -> bool {
    id.len() == 64 && id.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Local content-addressed store
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    quota_bytes: Option<u64>,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            quota_bytes: None,
        }
    }

    /// Reject writes that would push total stored bytes past `quota_bytes`
    pub fn with_quota(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    /// `<data_dir>/journl/media`
    pub fn default_root() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("journl")
            .join("media")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn shard(&self, id: &str) -> PathBuf {
        self.root.join(&id[..2])
    }

    fn blob_path(&self, id: &str) -> PathBuf {
        self.shard(id).join(id)
    }

    fn sidecar_path(&self, id: &str) -> PathBuf {
        self.shard(id).join(format!("{}.{}", id, SIDECAR_EXT))
    }

    fn check_id<'a>(&self, id: &'a str) -> Result<&'a str, StorageError> {
        if is_digest(id) {
            Ok(id)
        } else {
            Err(StorageError::NotFound(id.to_string()))
        }
    }

    async fn write_sidecar(
        &self,
        id: &str,
        size: u64,
        mime_type: &str,
        name: &str,
    ) -> Result<(), StorageError> {
        let meta = StoredMedia {
            id: id.to_string(),
            name: name.to_string(),
            mime: mime_type.to_string(),
            size,
            created_at: Utc::now(),
        };
        let json = serde_json::to_vec_pretty(&meta)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        fs::write(self.sidecar_path(id), json)
            .await
            .map_err(write_error)
    }

    /// Stored metadata for `id`
    pub async fn metadata(&self, id: &str) -> Result<StoredMedia, StorageError> {
        let id = self.check_id(id)?;
        let raw = fs::read(self.sidecar_path(id))
            .await
            .map_err(|e| read_error(id, e))?;
        serde_json::from_slice(&raw).map_err(|e| StorageError::ReadFailed(e.to_string()))
    }

    /// Total bytes of stored blobs, sidecars excluded
    pub async fn usage(&self) -> Result<u64, StorageError> {
        let mut total = 0;
        let mut shards = match fs::read_dir(&self.root).await {
            Ok(shards) => shards,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(StorageError::ReadFailed(e.to_string())),
        };

        while let Some(shard) = shards
            .next_entry()
            .await
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?
        {
            if !shard.path().is_dir() {
                continue;
            }
            let mut entries = fs::read_dir(shard.path())
                .await
                .map_err(|e| StorageError::ReadFailed(e.to_string()))?;
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| StorageError::ReadFailed(e.to_string()))?
            {
                if entry.path().extension().is_some() {
                    continue;
                }
                let meta = entry
                    .metadata()
                    .await
                    .map_err(|e| StorageError::ReadFailed(e.to_string()))?;
                total += meta.len();
            }
        }

        Ok(total)
    }
}

fn read_error(id: &str, err: std::io::Error) -> StorageError {
    if err.kind() == ErrorKind::NotFound {
        StorageError::NotFound(id.to_string())
    } else {
        StorageError::ReadFailed(err.to_string())
    }
}

fn write_error(err: std::io::Error) -> StorageError {
    StorageError::WriteFailed(err.to_string())
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(
        &self,
        bytes: &[u8],
        mime_type: &str,
        suggested_name: &str,
    ) -> Result<String, StorageError> {
        let id = content_digest(bytes);
        let blob_path = self.blob_path(&id);

        if fs::try_exists(&blob_path).await.unwrap_or(false) {
            debug!(id = %id, "media already stored");
            if !fs::try_exists(self.sidecar_path(&id)).await.unwrap_or(false) {
                warn!(id = %id, "metadata missing, rewriting");
                self.write_sidecar(&id, bytes.len() as u64, mime_type, suggested_name)
                    .await?;
            }
            return Ok(id);
        }

        if let Some(quota) = self.quota_bytes {
            let used = self.usage().await?;
            if used + bytes.len() as u64 > quota {
                return Err(StorageError::QuotaExceeded(format!(
                    "{} bytes in use, {} more would exceed the {} byte quota",
                    used,
                    bytes.len(),
                    quota
                )));
            }
        }

        fs::create_dir_all(self.shard(&id))
            .await
            .map_err(write_error)?;

        // Blobs only appear under their digest once fully written
        let partial = blob_path.with_extension("partial");
        fs::write(&partial, bytes).await.map_err(write_error)?;
        fs::rename(&partial, &blob_path)
            .await
            .map_err(write_error)?;

        self.write_sidecar(&id, bytes.len() as u64, mime_type, suggested_name)
            .await?;

        info!(id = %id, size = bytes.len(), mime = mime_type, "media stored");
        Ok(id)
    }

    async fn load(&self, reference: &str) -> Result<Vec<u8>, StorageError> {
        let id = self.check_id(reference)?;
        fs::read(self.blob_path(id))
            .await
            .map_err(|e| read_error(id, e))
    }

    async fn delete(&self, reference: &str) -> Result<(), StorageError> {
        let id = self.check_id(reference)?;
        fs::remove_file(self.blob_path(id)).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound(id.to_string())
            } else {
                write_error(e)
            }
        })?;

        match fs::remove_file(self.sidecar_path(id)).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(write_error(e)),
        }

        info!(id = %id, "media deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_lowercase_hex() {
        let id = content_digest(b"abc");
        assert_eq!(
            id,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(is_digest(&id));
    }

    #[test]
    fn non_digest_ids_are_rejected() {
        assert!(!is_digest("abc"));
        assert!(!is_digest("../../../etc/passwd"));
        assert!(!is_digest(&"G".repeat(64)));
    }

    #[test]
    fn paths_are_sharded_by_prefix() {
        let store = LocalMediaStore::new("/media");
        let id = content_digest(b"abc");
        assert_eq!(store.blob_path(&id), PathBuf::from(format!("/media/ba/{}", id)));
        assert_eq!(
            store.sidecar_path(&id),
            PathBuf::from(format!("/media/ba/{}.json", id))
        );
    }

    #[test]
    fn default_root_ends_in_media() {
        let root = LocalMediaStore::default_root();
        assert!(root.ends_with("journl/media"));
    }
}
