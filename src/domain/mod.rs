//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod journal;
pub mod media;
pub mod recording;

// Re-export common types
pub use config::{AppConfig, StorageBackend};
pub use error::*;
pub use journal::JournalEntry;
pub use media::{LinkPreview, MediaItem, MediaKind};
pub use recording::{AudioBlob, AudioMimeType, Duration, RecorderState, RecordingSession};
