//! Configuration domain module

mod app_config;
mod storage_backend;

pub use app_config::{AppConfig, RemoteConfig, DEFAULT_BUCKET, DEFAULT_FRAME_RATE};
pub use storage_backend::StorageBackend;
