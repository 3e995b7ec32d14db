//! Attach, link and media command handlers

use std::path::Path;

use crate::application::ports::{MediaStore, StorageError};
use crate::application::{MediaUploader, UploadError};
use crate::infrastructure::storage::LocalMediaStore;
use crate::infrastructure::StubLinkPreviewer;

use super::args::MediaAction;
use super::presenter::Presenter;

fn print_json<T: serde::Serialize>(presenter: &Presenter, value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => presenter.output(&text),
        Err(e) => presenter.error(&format!("Failed to serialize output: {}", e)),
    }
}

/// Store a file and print its media item as JSON
pub async fn handle_attach<S: MediaStore>(
    path: &Path,
    store: S,
    presenter: &Presenter,
) -> Result<(), UploadError> {
    let uploader = MediaUploader::new(store, StubLinkPreviewer::new());
    let item = uploader.add_file(path).await?;
    presenter.success(&format!("Attached {} ({})", item.name(), item.kind()));
    print_json(presenter, &item);
    Ok(())
}

/// Build a link item with a preview and print it as JSON
pub async fn handle_link<S: MediaStore>(
    url: &str,
    store: S,
    presenter: &Presenter,
) -> Result<(), UploadError> {
    let uploader = MediaUploader::new(store, StubLinkPreviewer::new());
    let item = uploader.add_link(url).await?;
    print_json(presenter, &item);
    Ok(())
}

/// Handle `journl media` subcommands against the local store
pub async fn handle_media_command(
    action: MediaAction,
    store: &LocalMediaStore,
    presenter: &Presenter,
) -> Result<(), StorageError> {
    match action {
        MediaAction::Path => {
            presenter.output(&store.root().to_string_lossy());
            Ok(())
        }
        MediaAction::Show { id } => {
            let meta = store.metadata(&id).await?;
            print_json(presenter, &meta);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn attach_stores_image() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("photo.png");
        std::fs::write(&file, b"png bytes").unwrap();
        let store = LocalMediaStore::new(dir.path().join("media"));

        handle_attach(&file, store.clone(), &Presenter::new())
            .await
            .unwrap();
        assert!(store.usage().await.unwrap() > 0);
    }

    #[tokio::test]
    async fn attach_rejects_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let store = LocalMediaStore::new(dir.path());
        let err = handle_attach(Path::new("notes.txt"), store, &Presenter::new())
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType { .. }));
    }

    #[tokio::test]
    async fn link_rejects_empty_url() {
        let dir = TempDir::new().unwrap();
        let store = LocalMediaStore::new(dir.path());
        let err = handle_link("  ", store, &Presenter::new()).await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn show_unknown_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = LocalMediaStore::new(dir.path());
        let action = MediaAction::Show {
            id: "0".repeat(64),
        };
        let err = handle_media_command(action, &store, &Presenter::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}
