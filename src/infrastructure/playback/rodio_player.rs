//! Rodio-based playback adapter
//!
//! Each playback owns a thread holding the rodio output stream (which is not
//! `Send`). The handle talks to it over a command channel and learns about
//! completion through a watch channel.

use std::io::Cursor;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};
use tokio::sync::{oneshot, watch};
use tracing::{debug, warn};

use crate::application::ports::{AudioPlayer, Playback, PlaybackError};
use crate::domain::recording::AudioBlob;

/// How often the playback thread checks whether the sink drained
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Pause,
    Resume,
    Stop,
}

/// Audio player using the default rodio output device
#[derive(Debug, Default, Clone, Copy)]
pub struct RodioPlayer;

impl RodioPlayer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AudioPlayer for RodioPlayer {
    async fn open(&self, blob: &AudioBlob) -> Result<Box<dyn Playback>, PlaybackError> {
        let data = blob.shared();
        let (ready_tx, ready_rx) = oneshot::channel();
        let (command_tx, command_rx) = mpsc::channel();
        let (done_tx, done_rx) = watch::channel(false);

        std::thread::Builder::new()
            .name("journl-playback".into())
            .spawn(move || play_sync(data, ready_tx, command_rx, done_tx))
            .map_err(|e| PlaybackError::PlaybackFailed(e.to_string()))?;

        ready_rx.await.map_err(|_| {
            PlaybackError::PlaybackFailed("playback thread exited before starting".into())
        })??;

        Ok(Box::new(RodioPlayback {
            commands: command_tx,
            done: done_rx,
        }))
    }
}

/// Runs on the playback thread until the sink drains or a stop arrives
fn play_sync(
    data: Arc<[u8]>,
    ready: oneshot::Sender<Result<(), PlaybackError>>,
    commands: mpsc::Receiver<Command>,
    done: watch::Sender<bool>,
) {
    let (_stream, stream_handle) = match OutputStream::try_default() {
        Ok(output) => output,
        Err(e) => {
            let _ = ready.send(Err(PlaybackError::DeviceNotAvailable(e.to_string())));
            return;
        }
    };

    let sink = match Sink::try_new(&stream_handle) {
        Ok(sink) => sink,
        Err(e) => {
            let _ = ready.send(Err(PlaybackError::PlaybackFailed(e.to_string())));
            return;
        }
    };

    let source = match Decoder::new(Cursor::new(data)) {
        Ok(source) => source,
        Err(e) => {
            let _ = ready.send(Err(PlaybackError::Decode(e.to_string())));
            return;
        }
    };

    sink.append(source);
    let _ = ready.send(Ok(()));
    debug!("playback started");

    loop {
        match commands.recv_timeout(POLL_INTERVAL) {
            Ok(Command::Pause) => sink.pause(),
            Ok(Command::Resume) => sink.play(),
            Ok(Command::Stop) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                if sink.empty() {
                    break;
                }
            }
        }
    }

    sink.stop();
    done.send_replace(true);
    debug!("playback finished");
}

/// Handle to a playback thread. Dropping it disconnects the channel,
/// which stops the thread.
pub struct RodioPlayback {
    commands: mpsc::Sender<Command>,
    done: watch::Receiver<bool>,
}

impl RodioPlayback {
    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() && command != Command::Stop {
            warn!(?command, "playback thread already gone");
        }
    }
}

impl Playback for RodioPlayback {
    fn pause(&self) {
        self.send(Command::Pause);
    }

    fn resume(&self) {
        self.send(Command::Resume);
    }

    fn stop(&self) {
        self.send(Command::Stop);
    }

    fn completion(&self) -> watch::Receiver<bool> {
        self.done.clone()
    }
}
