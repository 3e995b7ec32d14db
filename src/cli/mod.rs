//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, logging setup
//! and the command runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod logging;
pub mod media_cmd;
pub mod presenter;

// Re-export commonly used types
pub use app::{load_merged_config, run_record, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, MediaAction, RecordArgs, RecordOptions};
pub use logging::init_logging;
pub use presenter::Presenter;
