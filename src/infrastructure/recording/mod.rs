//! Recording infrastructure module
//!
//! Microphone capture via cpal, FLAC finalization and the waveform frame clock.

mod cpal_input;
mod flac_encoder;
mod frame_clock;

pub use cpal_input::{CpalCapture, CpalInput, DEFAULT_WINDOW_LEN};
pub use flac_encoder::{encode_to_flac, resample_to_16k, FlacEncoder, TARGET_SAMPLE_RATE};
pub use frame_clock::IntervalFrameClock;
