//! Audio input port interfaces

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Device acquisition errors
#[derive(Debug, Clone, Error)]
pub enum DeviceError {
    #[error("Microphone access denied: {0}")]
    PermissionDenied(String),

    #[error("No audio input device available")]
    NoInputDevice,

    #[error("Failed to open audio input: {0}")]
    OpenFailed(String),
}

/// Port for acquiring a live microphone stream
#[async_trait]
pub trait AudioInput: Send + Sync {
    /// Acquire the input device and start capturing.
    ///
    /// Resolves once the device is live or has definitively failed; it must
    /// not block the runtime while the platform negotiates access.
    async fn acquire(&self) -> Result<Arc<dyn CaptureStream>, DeviceError>;
}

/// A live capture on an acquired device.
///
/// Captured audio is mono 16-bit PCM at [`CaptureStream::sample_rate`].
pub trait CaptureStream: Send + Sync {
    fn sample_rate(&self) -> u32;

    /// Most recent amplitude window, one value per sample in [0, 1]
    fn amplitude_window(&self) -> Vec<f32>;

    /// Drain the chunks captured since the previous call, oldest first
    fn take_chunks(&self) -> Vec<Vec<i16>>;

    /// Stop capturing and release the device.
    ///
    /// Idempotent. Chunks captured before release remain drainable.
    fn release(&self);

    fn is_released(&self) -> bool;
}
