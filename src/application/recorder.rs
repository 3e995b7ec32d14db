//! Voice recorder use case
//!
//! Drives one microphone capture at a time through
//! `Idle -> Recording -> Stopped -> Idle`, publishing live waveform levels
//! and an elapsed-seconds clock while recording, and handing the finished
//! blob to a [`MediaStore`] on save.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant};
use tracing::{debug, info, warn};

use crate::domain::error::InvalidMediaItem;
use crate::domain::media::MediaItem;
use crate::domain::recording::{
    reduce_to_bars, AudioBlob, AudioMimeType, InvalidStateTransition, RecorderState,
    RecorderStateMachine, RecordingSession, DEFAULT_BAR_COUNT, DEFAULT_HISTORY_LEN,
};

use super::ports::{
    AudioEncoder, AudioInput, AudioPlayer, CaptureStream, DeviceError, EncodingError, FrameClock,
    MediaStore, Playback, PlaybackError, StorageError,
};

/// Errors from the recorder use case
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("Microphone unavailable: {0}")]
    DeviceUnavailable(#[from] DeviceError),

    #[error("Could not save recording: {0}")]
    Storage(#[from] StorageError),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("{0}")]
    InvalidState(#[from] InvalidStateTransition),

    #[error("Could not finalize recording: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Nothing was recorded")]
    EmptyRecording,

    #[error("Invalid media item: {0}")]
    InvalidMedia(#[from] InvalidMediaItem),
}

/// Tunables for the live waveform
#[derive(Debug, Clone, Copy)]
pub struct RecorderSettings {
    /// Bars per published level frame
    pub bars: usize,
    /// Frames of peak history kept per session
    pub history_len: usize,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            bars: DEFAULT_BAR_COUNT,
            history_len: DEFAULT_HISTORY_LEN,
        }
    }
}

pub type LevelsCallback = Arc<dyn Fn(&[f32]) + Send + Sync>;
pub type TickCallback = Arc<dyn Fn(u64) + Send + Sync>;
pub type CompleteCallback = Arc<dyn Fn(&MediaItem) + Send + Sync>;
pub type PlaybackEndCallback = Arc<dyn Fn() + Send + Sync>;

/// Callbacks for live updates
#[derive(Default, Clone)]
pub struct RecorderCallbacks {
    /// Called once per frame with the bar levels, each in [0, 1]
    pub on_levels: Option<LevelsCallback>,
    /// Called every second with the elapsed seconds
    pub on_tick: Option<TickCallback>,
    /// Called exactly once per successful save
    pub on_recording_complete: Option<CompleteCallback>,
    /// Called when playback reaches the end of the blob
    pub on_playback_end: Option<PlaybackEndCallback>,
}

/// Result of a successful stop
#[derive(Debug, Clone)]
pub struct RecordingSummary {
    pub elapsed_secs: u64,
    pub size_bytes: usize,
    pub mime_type: AudioMimeType,
}

impl RecordingSummary {
    pub fn human_readable_size(&self) -> String {
        crate::domain::recording::human_readable_size(self.size_bytes as u64)
    }
}

#[derive(Default)]
struct Shared {
    machine: RecorderStateMachine,
    session: Option<RecordingSession>,
    playback: Option<ActivePlayback>,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Session disposer: owns the device stream and both session tasks
struct ActiveCapture {
    stream: Arc<dyn CaptureStream>,
    timer: JoinHandle<()>,
    sampler: JoinHandle<()>,
}

impl ActiveCapture {
    /// Cancel and join both tasks, release the device, then drain what is left
    async fn shutdown(mut self) -> Vec<Vec<i16>> {
        self.timer.abort();
        self.sampler.abort();
        let _ = (&mut self.timer).await;
        let _ = (&mut self.sampler).await;

        // Releasing joins the device thread
        let stream = Arc::clone(&self.stream);
        if tokio::task::spawn_blocking(move || stream.release())
            .await
            .is_err()
        {
            self.stream.release();
        }
        debug!("audio device released");
        self.stream.take_chunks()
    }
}

impl Drop for ActiveCapture {
    fn drop(&mut self) {
        self.timer.abort();
        self.sampler.abort();
        self.stream.release();
    }
}

struct ActivePlayback {
    generation: u64,
    handle: Box<dyn Playback>,
    watcher: Option<JoinHandle<()>>,
}

impl Drop for ActivePlayback {
    fn drop(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.abort();
        }
        self.handle.stop();
    }
}

/// Voice recorder use case
pub struct VoiceRecorder<I, C, E, S, P>
where
    I: AudioInput,
    C: FrameClock,
    E: AudioEncoder + 'static,
    S: MediaStore,
    P: AudioPlayer,
{
    input: I,
    clock: C,
    encoder: Arc<E>,
    store: S,
    player: P,
    settings: RecorderSettings,
    callbacks: RecorderCallbacks,
    shared: Arc<Mutex<Shared>>,
    capture: Option<ActiveCapture>,
    playback_generation: u64,
}

impl<I, C, E, S, P> VoiceRecorder<I, C, E, S, P>
where
    I: AudioInput,
    C: FrameClock,
    E: AudioEncoder + 'static,
    S: MediaStore,
    P: AudioPlayer,
{
    /// Create a new recorder in the idle state
    pub fn new(input: I, clock: C, encoder: E, store: S, player: P) -> Self {
        Self {
            input,
            clock,
            encoder: Arc::new(encoder),
            store,
            player,
            settings: RecorderSettings::default(),
            callbacks: RecorderCallbacks::default(),
            shared: Arc::new(Mutex::new(Shared::default())),
            capture: None,
            playback_generation: 0,
        }
    }

    pub fn with_settings(mut self, settings: RecorderSettings) -> Self {
        self.settings = RecorderSettings {
            bars: settings.bars.max(1),
            history_len: settings.history_len.max(1),
        };
        self
    }

    pub fn with_callbacks(mut self, callbacks: RecorderCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        lock(&self.shared)
    }

    /// Get current recorder state
    pub fn state(&self) -> RecorderState {
        self.lock().machine.state()
    }

    /// Elapsed whole seconds of the current session, 0 when idle
    pub fn elapsed_secs(&self) -> u64 {
        self.lock()
            .session
            .as_ref()
            .map(RecordingSession::elapsed_secs)
            .unwrap_or(0)
    }

    /// Snapshot of the per-frame peak history
    pub fn amplitude_history(&self) -> Vec<f32> {
        self.lock()
            .session
            .as_ref()
            .map(|s| s.history().to_vec())
            .unwrap_or_default()
    }

    /// The finalized blob, present only while stopped
    pub fn blob(&self) -> Option<AudioBlob> {
        self.lock()
            .session
            .as_ref()
            .and_then(|s| s.blob().cloned())
    }

    /// Acquire the microphone and begin a fresh session
    pub async fn start(&mut self) -> Result<(), RecorderError> {
        self.lock().machine.ensure_can_start()?;

        let stream = self.input.acquire().await.map_err(|e| {
            warn!(error = %e, "audio device acquisition failed");
            RecorderError::DeviceUnavailable(e)
        })?;
        info!(sample_rate = stream.sample_rate(), "audio device acquired");

        {
            let mut shared = self.lock();
            if let Err(e) = shared.machine.start() {
                drop(shared);
                stream.release();
                return Err(e.into());
            }
            shared.session = Some(RecordingSession::new(
                stream.sample_rate(),
                self.settings.history_len,
            ));
        }

        let timer = self.spawn_timer();
        let sampler = self.spawn_sampler(Arc::clone(&stream));
        self.capture = Some(ActiveCapture {
            stream,
            timer,
            sampler,
        });

        Ok(())
    }

    fn spawn_timer(&self) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        let on_tick = self.callbacks.on_tick.clone();

        tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut ticks = interval_at(Instant::now() + period, period);
            loop {
                ticks.tick().await;
                // Publish under the lock; a cleared session ends the task
                let mut shared = lock(&shared);
                let Some(session) = shared.session.as_mut() else {
                    break;
                };
                let elapsed = session.tick();
                if let Some(ref cb) = on_tick {
                    cb(elapsed);
                }
            }
        })
    }

    fn spawn_sampler(&self, stream: Arc<dyn CaptureStream>) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        let on_levels = self.callbacks.on_levels.clone();
        let bars = self.settings.bars;
        let mut frames = self.clock.frames();

        tokio::spawn(async move {
            while frames.next_frame().await {
                let levels = reduce_to_bars(&stream.amplitude_window(), bars);
                let mut shared = lock(&shared);
                let Some(session) = shared.session.as_mut() else {
                    break;
                };
                if stream.is_released() {
                    break;
                }
                session.extend_chunks(stream.take_chunks());
                session.record_levels(&levels);
                if let Some(ref cb) = on_levels {
                    cb(&levels);
                }
            }
        })
    }

    /// Stop capturing and finalize the session into one blob
    pub async fn stop(&mut self) -> Result<RecordingSummary, RecorderError> {
        self.lock().machine.ensure_can_stop()?;

        let trailing = match self.capture.take() {
            Some(capture) => capture.shutdown().await,
            None => Vec::new(),
        };

        let (samples, sample_rate) = {
            let mut shared = self.lock();
            match shared.session.as_mut() {
                Some(session) => {
                    session.extend_chunks(trailing);
                    (session.take_samples(), session.sample_rate())
                }
                None => (Vec::new(), 0),
            }
        };

        let encoded = if samples.is_empty() {
            Ok(AudioBlob::empty(self.encoder.mime_type()))
        } else {
            let encoder = Arc::clone(&self.encoder);
            tokio::task::spawn_blocking(move || encoder.encode(&samples, sample_rate))
                .await
                .unwrap_or_else(|e| Err(EncodingError::Encode(e.to_string())))
        };

        let mut shared = self.lock();
        match encoded {
            Ok(blob) => {
                let summary = RecordingSummary {
                    elapsed_secs: shared
                        .session
                        .as_ref()
                        .map(RecordingSession::elapsed_secs)
                        .unwrap_or(0),
                    size_bytes: blob.size_bytes(),
                    mime_type: blob.mime_type(),
                };
                if let Some(session) = shared.session.as_mut() {
                    session.finalize(blob);
                }
                shared.machine.stop()?;
                info!(
                    elapsed_secs = summary.elapsed_secs,
                    size_bytes = summary.size_bytes,
                    "recording stopped"
                );
                Ok(summary)
            }
            Err(e) => {
                warn!(error = %e, "encoding failed, dropping session");
                shared.session = None;
                shared.machine.abort()?;
                Err(e.into())
            }
        }
    }

    /// Drop the finished recording and return to idle
    pub fn discard(&mut self) -> Result<(), RecorderError> {
        self.clear_buffer(false)?;
        debug!("recording discarded");
        Ok(())
    }

    fn clear_buffer(&mut self, saved: bool) -> Result<(), InvalidStateTransition> {
        let playback = {
            let mut shared = self.lock();
            if saved {
                shared.machine.complete_save()?;
            } else {
                shared.machine.discard()?;
            }
            shared.session = None;
            shared.playback.take()
        };
        drop(playback);
        Ok(())
    }

    /// Persist the finished recording and return the resulting media item
    pub async fn save(&mut self) -> Result<MediaItem, RecorderError> {
        let (blob, elapsed) = {
            let shared = self.lock();
            shared.machine.ensure_can_save()?;
            let session = shared.session.as_ref();
            match session.and_then(RecordingSession::blob) {
                Some(blob) if !blob.is_empty() => (
                    blob.clone(),
                    session.map(RecordingSession::elapsed_secs).unwrap_or(0),
                ),
                _ => return Err(RecorderError::EmptyRecording),
            }
        };

        let name = suggested_name(blob.mime_type());
        let reference = self
            .store
            .store(blob.data(), blob.mime_type().as_str(), &name)
            .await?;
        let item = MediaItem::voice(reference, name, blob.size_bytes() as u64, elapsed)?;
        info!(reference = item.reference(), duration = elapsed, "recording saved");

        if let Some(ref cb) = self.callbacks.on_recording_complete {
            cb(&item);
        }

        self.clear_buffer(true)?;
        Ok(item)
    }

    /// Play the finished recording, resuming if paused mid-way
    pub async fn play(&mut self) -> Result<(), RecorderError> {
        let blob = {
            let mut shared = self.lock();
            shared.machine.ensure_can_save()?;
            if shared.machine.is_playing() {
                return Ok(());
            }
            if let Some(ref playback) = shared.playback {
                playback.handle.resume();
                shared.machine.play()?;
                return Ok(());
            }
            match shared.session.as_ref().and_then(RecordingSession::blob) {
                Some(blob) if !blob.is_empty() => blob.clone(),
                _ => return Err(RecorderError::EmptyRecording),
            }
        };

        let handle = self.player.open(&blob).await?;
        self.playback_generation += 1;
        let generation = self.playback_generation;

        let mut shared = self.lock();
        shared.machine.play()?;
        let watcher = self.spawn_playback_watcher(handle.as_ref(), generation);
        shared.playback = Some(ActivePlayback {
            generation,
            handle,
            watcher: Some(watcher),
        });
        debug!(generation, "playback started");
        Ok(())
    }

    fn spawn_playback_watcher(&self, handle: &dyn Playback, generation: u64) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        let on_end = self.callbacks.on_playback_end.clone();
        let mut done = handle.completion();

        tokio::spawn(async move {
            while !*done.borrow_and_update() {
                if done.changed().await.is_err() {
                    break;
                }
            }

            let finished = {
                let mut shared = lock(&shared);
                let current = shared
                    .playback
                    .as_ref()
                    .is_some_and(|p| p.generation == generation);
                if current {
                    shared.machine.playback_finished();
                    shared.playback.take().map(|mut p| {
                        p.watcher = None;
                        p
                    })
                } else {
                    None
                }
            };

            if finished.is_some() {
                drop(finished);
                if let Some(ref cb) = on_end {
                    cb();
                }
            }
        })
    }

    /// Pause playback, keeping the position
    pub fn pause(&mut self) -> Result<(), RecorderError> {
        let mut shared = self.lock();
        if let Some(ref playback) = shared.playback {
            playback.handle.pause();
        }
        shared.machine.pause()?;
        Ok(())
    }
}

impl<I, C, E, S, P> Drop for VoiceRecorder<I, C, E, S, P>
where
    I: AudioInput,
    C: FrameClock,
    E: AudioEncoder + 'static,
    S: MediaStore,
    P: AudioPlayer,
{
    fn drop(&mut self) {
        // Once the session is gone neither task publishes again
        let playback = {
            let mut shared = self.lock();
            if self.capture.is_some() {
                shared.session = None;
            }
            shared.playback.take()
        };
        drop(self.capture.take());
        drop(playback);
    }
}

fn suggested_name(mime_type: AudioMimeType) -> String {
    format!(
        "voice-note-{}.{}",
        Utc::now().format("%Y%m%d-%H%M%S"),
        mime_type.extension()
    )
}
