//! Media storage adapters

mod local;
mod remote;

pub use local::{content_digest, LocalMediaStore, StoredMedia};
pub use remote::RemoteMediaStore;

use crate::application::ports::{MediaStore, StorageError};
use crate::domain::config::{AppConfig, StorageBackend};

/// Local store rooted at the configured media dir, or the default data dir
pub fn local_store(config: &AppConfig) -> LocalMediaStore {
    let root = config
        .media_dir()
        .unwrap_or_else(LocalMediaStore::default_root);
    let store = LocalMediaStore::new(root);
    match config.quota_bytes {
        Some(quota) => store.with_quota(quota),
        None => store,
    }
}

/// Create the media store selected by `config`
pub fn create_media_store(config: &AppConfig) -> Result<Box<dyn MediaStore>, StorageError> {
    match config.storage_or_default() {
        StorageBackend::Local => Ok(Box::new(local_store(config))),
        StorageBackend::Remote => {
            let endpoint = config.remote_endpoint().ok_or_else(|| {
                StorageError::NotConfigured(
                    "set remote.endpoint via 'journl config set remote.endpoint <url>'".into(),
                )
            })?;
            let api_key = config.remote_api_key().ok_or_else(|| {
                StorageError::NotConfigured(
                    "set JOURNL_REMOTE_KEY or 'journl config set remote.api_key <key>'".into(),
                )
            })?;
            Ok(Box::new(RemoteMediaStore::new(
                endpoint,
                config.remote_bucket_or_default(),
                api_key,
            )))
        }
    }
}
