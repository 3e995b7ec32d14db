//! journl CLI entry point

use std::process::ExitCode;

use clap::Parser;

use journl::cli::{
    app::{load_merged_config, run_record, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands, RecordArgs, RecordOptions},
    config_cmd::handle_config_command,
    init_logging,
    media_cmd::{handle_attach, handle_link, handle_media_command},
    presenter::Presenter,
};
use journl::domain::config::{AppConfig, StorageBackend};
use journl::domain::recording::Duration;
use journl::infrastructure::storage::{create_media_store, local_store};
use journl::infrastructure::XdgConfigStore;

fn storage_override(storage: Option<StorageBackend>) -> AppConfig {
    AppConfig {
        storage: storage.map(|s| s.to_string()),
        ..Default::default()
    }
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    let presenter = Presenter::new();

    match cli.command {
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Commands::Media { action } => {
            let config = load_merged_config(AppConfig::empty()).await;
            if let Err(e) = handle_media_command(action, &local_store(&config), &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Commands::Link { url } => {
            let config = load_merged_config(AppConfig::empty()).await;
            if let Err(e) = handle_link(&url, local_store(&config), &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Commands::Attach { path, storage } => {
            let config = load_merged_config(storage_override(storage.map(Into::into))).await;
            let store = match create_media_store(&config) {
                Ok(store) => store,
                Err(e) => {
                    presenter.error(&e.to_string());
                    return ExitCode::from(EXIT_ERROR);
                }
            };
            if let Err(e) = handle_attach(&path, store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Commands::Record(args) => record(args, &presenter).await,
    }
}

async fn record(args: RecordArgs, presenter: &Presenter) -> ExitCode {
    let cli_config = AppConfig {
        max_duration: args.max_duration.clone(),
        ..storage_override(args.storage.map(Into::into))
    };
    let config = load_merged_config(cli_config).await;

    let max_duration = match config.max_duration.as_ref() {
        Some(s) => match s.parse::<Duration>() {
            Ok(d) => d,
            Err(e) => {
                presenter.error(&format!("Invalid max-duration: {}", e));
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        },
        None => Duration::default_max_duration(),
    };

    let options = RecordOptions {
        max_duration,
        bars: config.waveform_bars_or_default(),
        frame_rate: config.frame_rate_or_default(),
        json: args.json,
    };

    run_record(options, &config).await
}
