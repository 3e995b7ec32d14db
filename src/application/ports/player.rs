//! Playback port interfaces

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use crate::domain::recording::AudioBlob;

/// Playback errors
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("Audio output not available: {0}")]
    DeviceNotAvailable(String),

    #[error("Recording could not be decoded: {0}")]
    Decode(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

/// Port for playing back a finished recording
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Start playing `blob` from the beginning
    async fn open(&self, blob: &AudioBlob) -> Result<Box<dyn Playback>, PlaybackError>;
}

/// Handle to one playback of a blob.
///
/// Dropping the handle must stop playback and free its output resources.
pub trait Playback: Send + Sync {
    fn pause(&self);

    fn resume(&self);

    /// Stop for good; completion fires if it has not already
    fn stop(&self);

    /// Flips to `true` when playback reaches the end or is stopped
    fn completion(&self) -> watch::Receiver<bool>;
}
