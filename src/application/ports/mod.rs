//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod audio_input;
pub mod config;
pub mod encoder;
pub mod frame_clock;
pub mod link_preview;
pub mod media_store;
pub mod player;

// Re-export common types
pub use audio_input::{AudioInput, CaptureStream, DeviceError};
pub use config::ConfigStore;
pub use encoder::{AudioEncoder, EncodingError};
pub use frame_clock::{FrameClock, Frames};
pub use link_preview::{LinkPreviewError, LinkPreviewer};
pub use media_store::{MediaStore, StorageError};
pub use player::{AudioPlayer, Playback, PlaybackError};
