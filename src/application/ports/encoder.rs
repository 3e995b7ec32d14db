//! Audio encoder port interface

use thiserror::Error;

use crate::domain::recording::{AudioBlob, AudioMimeType};

/// Encoding errors
#[derive(Debug, Clone, Error)]
pub enum EncodingError {
    #[error("Encoder config error: {0}")]
    Config(String),

    #[error("Resampling failed: {0}")]
    Resample(String),

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("Encoded output could not be written: {0}")]
    Write(String),
}

/// Port for turning captured PCM into a finished recording blob.
///
/// Encoding is CPU-bound and synchronous; callers run it off the async
/// executor.
pub trait AudioEncoder: Send + Sync {
    /// MIME type of the blobs this encoder produces
    fn mime_type(&self) -> AudioMimeType;

    /// Encode mono samples captured at `sample_rate`
    fn encode(&self, samples: &[i16], sample_rate: u32) -> Result<AudioBlob, EncodingError>;
}
