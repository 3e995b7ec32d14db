//! Microphone input using cpal
//!
//! The cpal stream is not `Send`, so each acquisition gets a dedicated
//! thread that builds the stream, reports readiness and then parks until
//! the capture is released.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::flac_encoder::TARGET_SAMPLE_RATE;
use crate::application::ports::{AudioInput, CaptureStream, DeviceError};

/// Samples kept for the live amplitude window
pub const DEFAULT_WINDOW_LEN: usize = 2048;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Audio input backed by the default cpal input device
pub struct CpalInput {
    window_len: usize,
}

impl CpalInput {
    pub fn new() -> Self {
        Self {
            window_len: DEFAULT_WINDOW_LEN,
        }
    }

    pub fn with_window_len(window_len: usize) -> Self {
        Self {
            window_len: window_len.max(1),
        }
    }

    /// Get the default input device
    fn get_input_device() -> Result<cpal::Device, DeviceError> {
        let host = cpal::default_host();
        host.default_input_device().ok_or(DeviceError::NoInputDevice)
    }

    /// Pick an i16/f32 config, preferring fewer channels and 16kHz support
    fn get_input_config(
        device: &cpal::Device,
    ) -> Result<(StreamConfig, SampleFormat), DeviceError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| classify(e.to_string()))?;

        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;
        for config in supported_configs {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_target = config.min_sample_rate().0 <= TARGET_SAMPLE_RATE
                && config.max_sample_rate().0 >= TARGET_SAMPLE_RATE;

            let is_better = match &best_config {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate =
                        includes_target && current.min_sample_rate().0 > TARGET_SAMPLE_RATE;
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let range = best_config
            .ok_or_else(|| DeviceError::OpenFailed("No suitable input config found".into()))?;

        let sample_rate = if range.min_sample_rate().0 <= TARGET_SAMPLE_RATE
            && range.max_sample_rate().0 >= TARGET_SAMPLE_RATE
        {
            SampleRate(TARGET_SAMPLE_RATE)
        } else {
            range.min_sample_rate()
        };

        let config = StreamConfig {
            channels: range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };
        Ok((config, range.sample_format()))
    }

    /// Build and start the stream on the current thread
    fn open_stream(buffers: &Arc<CaptureBuffers>) -> Result<(cpal::Stream, u32), DeviceError> {
        let device = Self::get_input_device()?;
        let (config, sample_format) = Self::get_input_config(&device)?;
        let channels = config.channels;
        let on_error = |err: cpal::StreamError| warn!(error = %err, "audio stream error");

        let stream = match sample_format {
            SampleFormat::I16 => {
                let buffers = Arc::clone(buffers);
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        buffers.push(stereo_to_mono(data, channels));
                    },
                    on_error,
                    None,
                )
            }
            SampleFormat::F32 => {
                let buffers = Arc::clone(buffers);
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let i16_data: Vec<i16> =
                            data.iter().map(|&s| (s * 32767.0) as i16).collect();
                        buffers.push(stereo_to_mono(&i16_data, channels));
                    },
                    on_error,
                    None,
                )
            }
            other => {
                return Err(DeviceError::OpenFailed(format!(
                    "Unsupported sample format: {:?}",
                    other
                )))
            }
        }
        .map_err(|e| match e {
            cpal::BuildStreamError::DeviceNotAvailable => DeviceError::NoInputDevice,
            other => classify(other.to_string()),
        })?;

        stream.play().map_err(|e| classify(e.to_string()))?;
        Ok((stream, config.sample_rate.0))
    }
}

impl Default for CpalInput {
    fn default() -> Self {
        Self::new()
    }
}

/// Backends report denied microphone access as opaque strings
fn classify(message: String) -> DeviceError {
    let lower = message.to_ascii_lowercase();
    if lower.contains("permission") || lower.contains("denied") || lower.contains("not allowed") {
        DeviceError::PermissionDenied(message)
    } else {
        DeviceError::OpenFailed(message)
    }
}

/// Mix interleaved channels down to mono
fn stereo_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|chunk| {
            let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
            (sum / chunk.len() as i32) as i16
        })
        .collect()
}

/// State written by the audio callback and read by the sampler
struct CaptureBuffers {
    chunks: Mutex<Vec<Vec<i16>>>,
    window: Mutex<VecDeque<f32>>,
    window_len: usize,
    capturing: AtomicBool,
}

impl CaptureBuffers {
    fn new(window_len: usize) -> Self {
        Self {
            chunks: Mutex::new(Vec::new()),
            window: Mutex::new(VecDeque::with_capacity(window_len)),
            window_len,
            capturing: AtomicBool::new(true),
        }
    }

    fn push(&self, mono: Vec<i16>) {
        if mono.is_empty() || !self.capturing.load(Ordering::SeqCst) {
            return;
        }

        {
            let mut window = lock(&self.window);
            let skip = mono.len().saturating_sub(self.window_len);
            for &sample in &mono[skip..] {
                if window.len() == self.window_len {
                    window.pop_front();
                }
                window.push_back((sample as f32 / 32768.0).abs());
            }
        }

        lock(&self.chunks).push(mono);
    }

    fn window(&self) -> Vec<f32> {
        lock(&self.window).iter().copied().collect()
    }

    fn drain(&self) -> Vec<Vec<i16>> {
        std::mem::take(&mut *lock(&self.chunks))
    }
}

/// A live cpal capture
pub struct CpalCapture {
    sample_rate: u32,
    buffers: Arc<CaptureBuffers>,
    stop: Mutex<Option<mpsc::Sender<()>>>,
    thread: Mutex<Option<JoinHandle<()>>>,
    released: AtomicBool,
}

impl CaptureStream for CpalCapture {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn amplitude_window(&self) -> Vec<f32> {
        self.buffers.window()
    }

    fn take_chunks(&self) -> Vec<Vec<i16>> {
        self.buffers.drain()
    }

    fn release(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        self.buffers.capturing.store(false, Ordering::SeqCst);

        if let Some(stop) = lock(&self.stop).take() {
            let _ = stop.send(());
        }
        if let Some(thread) = lock(&self.thread).take() {
            if thread.join().is_err() {
                warn!("capture thread panicked");
            }
        }
        debug!("cpal stream closed");
    }

    fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

impl Drop for CpalCapture {
    fn drop(&mut self) {
        self.release();
    }
}

#[async_trait]
impl AudioInput for CpalInput {
    async fn acquire(&self) -> Result<Arc<dyn CaptureStream>, DeviceError> {
        let buffers = Arc::new(CaptureBuffers::new(self.window_len));
        let (ready_tx, ready_rx) = oneshot::channel::<Result<u32, DeviceError>>();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let thread_buffers = Arc::clone(&buffers);
        let thread = std::thread::Builder::new()
            .name("journl-capture".into())
            .spawn(move || {
                let stream = match CpalInput::open_stream(&thread_buffers) {
                    Ok((stream, sample_rate)) => {
                        let _ = ready_tx.send(Ok(sample_rate));
                        stream
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                // Park until released; a dropped sender also ends the capture
                let _ = stop_rx.recv();
                drop(stream);
            })
            .map_err(|e| DeviceError::OpenFailed(e.to_string()))?;

        let sample_rate = match ready_rx.await {
            Ok(result) => result?,
            Err(_) => {
                return Err(DeviceError::OpenFailed(
                    "capture thread exited before the device opened".into(),
                ))
            }
        };

        Ok(Arc::new(CpalCapture {
            sample_rate,
            buffers,
            stop: Mutex::new(Some(stop_tx)),
            thread: Mutex::new(Some(thread)),
            released: AtomicBool::new(false),
        }))
    }
}
