//! Remote object-storage adapter
//!
//! Talks to a Supabase-compatible storage API:
//! `POST {endpoint}/storage/v1/object/{bucket}/{object}`.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::ports::{MediaStore, StorageError};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "Key")]
    key: String,
}

/// Media store backed by a remote bucket
pub struct RemoteMediaStore {
    endpoint: String,
    bucket: String,
    api_key: String,
    client: reqwest::Client,
}

impl RemoteMediaStore {
    pub fn new(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Object name for an upload: a fresh UUID prefix keeps names unique
    fn object_name(suggested_name: &str) -> String {
        let safe: String = suggested_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        format!("{}-{}", Uuid::new_v4(), safe)
    }

    fn upload_url(&self, object: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.endpoint, self.bucket, object
        )
    }

    /// References are the `Key` returned on upload, i.e. `<bucket>/<object>`
    fn object_url(&self, reference: &str) -> String {
        format!("{}/storage/v1/object/{}", self.endpoint, reference)
    }

    async fn check_status(response: Response, reference: &str) -> Result<Response, StorageError> {
        let status = response.status();
        match status {
            s if s.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(StorageError::Unauthorized),
            StatusCode::PAYLOAD_TOO_LARGE => Err(StorageError::QuotaExceeded(format!(
                "HTTP {} for {}",
                status, reference
            ))),
            StatusCode::NOT_FOUND => Err(StorageError::NotFound(reference.to_string())),
            _ => {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(StorageError::UploadFailed(format!(
                    "HTTP {}: {}",
                    status, error_text
                )))
            }
        }
    }
}

#[async_trait]
impl MediaStore for RemoteMediaStore {
    async fn store(
        &self,
        bytes: &[u8],
        mime_type: &str,
        suggested_name: &str,
    ) -> Result<String, StorageError> {
        let object = Self::object_name(suggested_name);
        let url = self.upload_url(&object);
        debug!(url = %url, size = bytes.len(), "uploading media");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, mime_type)
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        let response = Self::check_status(response, &object).await?;
        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Invalid response: {}", e)))?;

        info!(key = %body.key, "media uploaded");
        Ok(body.key)
    }

    async fn load(&self, reference: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .client
            .get(self.object_url(reference))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;

        let response = Self::check_status(response, reference).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn delete(&self, reference: &str) -> Result<(), StorageError> {
        let response = self
            .client
            .delete(self.object_url(reference))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

        Self::check_status(response, reference).await?;
        info!(key = reference, "media deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_name_is_prefixed_and_sanitized() {
        let name = RemoteMediaStore::object_name("my note (1).flac");
        let (prefix, rest) = name.split_at(36);
        assert!(Uuid::parse_str(prefix).is_ok());
        assert_eq!(rest, "-my-note--1-.flac");
    }

    #[test]
    fn urls_strip_trailing_slash() {
        let store = RemoteMediaStore::new("https://x.supabase.co/", "journal-media", "k");
        assert_eq!(
            store.upload_url("a.flac"),
            "https://x.supabase.co/storage/v1/object/journal-media/a.flac"
        );
        assert_eq!(
            store.object_url("journal-media/a.flac"),
            "https://x.supabase.co/storage/v1/object/journal-media/a.flac"
        );
    }
}
