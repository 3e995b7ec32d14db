//! Interactive voice-note recording runner

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::application::ports::{ConfigStore, MediaStore};
use crate::application::{
    RecorderCallbacks, RecorderError, RecorderSettings, VoiceRecorder,
};
use crate::domain::config::{AppConfig, RemoteConfig};
use crate::domain::media::MediaItem;
use crate::domain::recording::{format_clock, DEFAULT_HISTORY_LEN};
use crate::infrastructure::{
    create_media_store, CpalInput, FlacEncoder, IntervalFrameClock, RodioPlayer, XdgConfigStore,
};

use super::args::RecordOptions;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable holding the remote storage API key
pub const REMOTE_KEY_ENV: &str = "JOURNL_REMOTE_KEY";

/// Config values taken from the environment
pub fn env_config() -> AppConfig {
    let api_key = env::var(REMOTE_KEY_ENV).ok().filter(|s| !s.is_empty());
    AppConfig {
        remote: api_key.map(|key| RemoteConfig {
            api_key: Some(key),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config file");
        AppConfig::empty()
    });

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config())
        .merge(cli_config)
}

/// Events forwarded from recorder callbacks to the UI loop
#[derive(Debug)]
enum UiEvent {
    Levels(Vec<f32>),
    Tick(u64),
    PlaybackEnded,
}

/// Post-recording choices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Save,
    Play,
    Pause,
    Discard,
}

/// A line of just spaces means pause; an empty line is ignored
fn parse_choice(line: &str) -> Option<Choice> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return line.contains(' ').then_some(Choice::Pause);
    }
    match trimmed.to_lowercase().as_str() {
        "s" | "save" => Some(Choice::Save),
        "p" | "play" => Some(Choice::Play),
        "pause" => Some(Choice::Pause),
        "d" | "discard" => Some(Choice::Discard),
        _ => None,
    }
}

fn print_item(presenter: &Presenter, item: &MediaItem, json: bool) {
    if json {
        match serde_json::to_string_pretty(item) {
            Ok(text) => presenter.output(&text),
            Err(e) => presenter.error(&format!("Failed to serialize media item: {}", e)),
        }
    } else {
        presenter.success(&format!(
            "Saved {} ({})",
            item.name(),
            format_clock(item.duration().unwrap_or(0))
        ));
        presenter.output(item.reference());
    }
}

/// Record a voice note, then let the user save, play or discard it
pub async fn run_record(options: RecordOptions, config: &AppConfig) -> ExitCode {
    let mut presenter = Presenter::new();

    let store: Box<dyn MediaStore> = match create_media_store(config) {
        Ok(store) => store,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let (events_tx, mut events) = mpsc::unbounded_channel();
    let levels_tx = events_tx.clone();
    let tick_tx = events_tx.clone();
    let callbacks = RecorderCallbacks {
        on_levels: Some(Arc::new(move |levels: &[f32]| {
            let _ = levels_tx.send(UiEvent::Levels(levels.to_vec()));
        })),
        on_tick: Some(Arc::new(move |elapsed: u64| {
            let _ = tick_tx.send(UiEvent::Tick(elapsed));
        })),
        on_recording_complete: Some(Arc::new(|item: &MediaItem| {
            info!(id = %item.id(), reference = item.reference(), "voice note complete");
        })),
        on_playback_end: Some(Arc::new(move || {
            let _ = events_tx.send(UiEvent::PlaybackEnded);
        })),
    };

    let mut recorder = VoiceRecorder::new(
        CpalInput::new(),
        IntervalFrameClock::new(options.frame_rate),
        FlacEncoder::new(),
        store,
        RodioPlayer::new(),
    )
    .with_settings(RecorderSettings {
        bars: options.bars,
        history_len: DEFAULT_HISTORY_LEN,
    })
    .with_callbacks(callbacks);

    if let Err(e) = recorder.start().await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    let max_secs = options.max_duration.as_secs();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut levels = vec![0.0; options.bars];
    let mut elapsed = 0;

    presenter.show_recording();
    presenter.update_recording(&levels, elapsed, max_secs);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(event) = events.recv() => match event {
                UiEvent::Levels(next) => {
                    levels = next;
                    presenter.update_recording(&levels, elapsed, max_secs);
                }
                UiEvent::Tick(secs) => {
                    elapsed = secs;
                    presenter.update_recording(&levels, elapsed, max_secs);
                    if elapsed >= max_secs {
                        break;
                    }
                }
                UiEvent::PlaybackEnded => {}
            },
            _ = lines.next_line() => break,
            _ = &mut ctrl_c => break,
        }
    }

    let summary = match recorder.stop().await {
        Ok(summary) => summary,
        Err(e) => {
            presenter.spinner_fail(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };
    presenter.spinner_success(&format!(
        "Recorded {} ({})",
        format_clock(summary.elapsed_secs),
        summary.human_readable_size()
    ));
    if summary.elapsed_secs >= max_secs {
        presenter.info("Maximum duration reached");
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        presenter.prompt("[s]ave  [p]lay  [space] pause  [d]iscard >");

        let line = tokio::select! {
            line = lines.next_line() => line,
            Some(UiEvent::PlaybackEnded) = events.recv() => {
                eprintln!();
                presenter.info("Playback finished");
                continue;
            }
            _ = &mut ctrl_c => Ok(None),
        };

        let Ok(Some(line)) = line else {
            eprintln!();
            let _ = recorder.discard();
            presenter.warn("Input closed, recording discarded");
            return ExitCode::from(EXIT_ERROR);
        };

        match parse_choice(&line) {
            Some(Choice::Save) => match recorder.save().await {
                Ok(item) => {
                    print_item(&presenter, &item, options.json);
                    return ExitCode::from(EXIT_SUCCESS);
                }
                Err(RecorderError::EmptyRecording) => {
                    let _ = recorder.discard();
                    presenter.error("Nothing was recorded");
                    return ExitCode::from(EXIT_ERROR);
                }
                Err(e) => presenter.error(&format!("{} (try again or discard)", e)),
            },
            Some(Choice::Play) => match recorder.play().await {
                Ok(()) => presenter.info("Playing..."),
                Err(e) => presenter.error(&e.to_string()),
            },
            Some(Choice::Pause) => {
                if let Err(e) = recorder.pause() {
                    presenter.error(&e.to_string());
                }
            }
            Some(Choice::Discard) => {
                if let Err(e) = recorder.discard() {
                    presenter.error(&e.to_string());
                    return ExitCode::from(EXIT_ERROR);
                }
                presenter.info("Recording discarded");
                return ExitCode::from(EXIT_SUCCESS);
            }
            None => {}
        }
    }
}
