//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod ports;
pub mod recorder;
pub mod uploader;

// Re-export use cases
pub use recorder::{
    RecorderCallbacks, RecorderError, RecorderSettings, RecordingSummary, VoiceRecorder,
};
pub use uploader::{mime_from_path, MediaUploader, UploadError};
