//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with cpal, rodio, the filesystem and remote storage.

pub mod config;
pub mod link_preview;
pub mod playback;
pub mod recording;
pub mod storage;

// Re-export adapters
pub use config::XdgConfigStore;
pub use link_preview::StubLinkPreviewer;
pub use playback::RodioPlayer;
pub use recording::{CpalInput, FlacEncoder, IntervalFrameClock};
pub use storage::{create_media_store, LocalMediaStore, RemoteMediaStore};
