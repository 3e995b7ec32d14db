//! Recording domain module

mod amplitude;
mod audio_blob;
mod duration;
mod session;
mod state;

pub use amplitude::{reduce_to_bars, AmplitudeHistory, DEFAULT_BAR_COUNT, DEFAULT_HISTORY_LEN};
pub use audio_blob::{human_readable_size, AudioBlob, AudioMimeType};
pub use duration::{format_clock, Duration, DEFAULT_MAX_DURATION_SECS};
pub use session::RecordingSession;
pub use state::{InvalidStateTransition, PlaybackState, RecorderState, RecorderStateMachine};
