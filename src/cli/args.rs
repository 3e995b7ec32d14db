//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::config::StorageBackend;
use crate::domain::recording::Duration;

/// journl - voice notes and media attachments for your journal
#[derive(Parser, Debug)]
#[command(name = "journl")]
#[command(version)]
#[command(about = "Record voice notes and attach media to journal entries")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a voice note (Enter stops, then save/play/discard)
    Record(RecordArgs),
    /// Attach an image or document from disk
    Attach {
        /// File to attach (png, jpg, gif, webp, pdf, doc, docx, ...)
        path: PathBuf,

        /// Storage backend override
        #[arg(short = 's', long, value_name = "BACKEND")]
        storage: Option<StorageArg>,
    },
    /// Attach a link with a generated preview
    Link {
        /// URL to attach; bare hosts are treated as https
        url: String,
    },
    /// Inspect the local media store
    Media {
        #[command(subcommand)]
        action: MediaAction,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options for `journl record`
#[derive(Args, Debug, Clone, Default)]
pub struct RecordArgs {
    /// Stop automatically after this long (e.g., 30s, 5m, 1m30s)
    #[arg(short = 'm', long, value_name = "TIME")]
    pub max_duration: Option<String>,

    /// Storage backend override
    #[arg(short = 's', long, value_name = "BACKEND")]
    pub storage: Option<StorageArg>,

    /// Print the saved media item as JSON
    #[arg(long)]
    pub json: bool,
}

/// Local media store actions
#[derive(Subcommand, Debug)]
pub enum MediaAction {
    /// Show the local media directory
    Path,
    /// Show stored metadata for a media id
    Show {
        /// Content digest returned when the media was stored
        id: String,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Storage backend argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StorageArg {
    Local,
    Remote,
}

impl From<StorageArg> for StorageBackend {
    fn from(arg: StorageArg) -> Self {
        match arg {
            StorageArg::Local => StorageBackend::Local,
            StorageArg::Remote => StorageBackend::Remote,
        }
    }
}

/// Parsed record options
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub max_duration: Duration,
    pub bars: usize,
    pub frame_rate: u32,
    pub json: bool,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "storage",
    "media_dir",
    "max_duration",
    "waveform_bars",
    "frame_rate",
    "quota_bytes",
    "remote.endpoint",
    "remote.bucket",
    "remote.api_key",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
