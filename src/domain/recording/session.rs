//! Transient state of one voice capture

use super::amplitude::AmplitudeHistory;
use super::audio_blob::AudioBlob;

/// In-memory state of an in-progress or just-finished capture.
///
/// While recording it accumulates mono PCM chunks and the amplitude history;
/// once finalized the chunks are replaced by a single immutable blob.
#[derive(Debug, Clone, Default)]
pub struct RecordingSession {
    elapsed_secs: u64,
    sample_rate: u32,
    chunks: Vec<Vec<i16>>,
    history: AmplitudeHistory,
    blob: Option<AudioBlob>,
}

impl RecordingSession {
    pub fn new(sample_rate: u32, history_len: usize) -> Self {
        Self {
            elapsed_secs: 0,
            sample_rate,
            chunks: Vec::new(),
            history: AmplitudeHistory::new(history_len),
            blob: None,
        }
    }

    /// Advance the elapsed counter by one second, returning the new value
    pub fn tick(&mut self) -> u64 {
        self.elapsed_secs += 1;
        self.elapsed_secs
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Append captured chunks in arrival order, skipping empty ones
    pub fn extend_chunks(&mut self, chunks: impl IntoIterator<Item = Vec<i16>>) {
        self.chunks
            .extend(chunks.into_iter().filter(|chunk| !chunk.is_empty()));
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn sample_count(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    /// Move the accumulated chunks out as one contiguous buffer
    pub fn take_samples(&mut self) -> Vec<i16> {
        let mut samples = Vec::with_capacity(self.sample_count());
        for chunk in self.chunks.drain(..) {
            samples.extend_from_slice(&chunk);
        }
        samples
    }

    pub fn record_levels(&mut self, bars: &[f32]) {
        self.history.push_frame(bars);
    }

    pub fn history(&self) -> &AmplitudeHistory {
        &self.history
    }

    /// Store the finalized blob; any remaining chunks are dropped
    pub fn finalize(&mut self, blob: AudioBlob) {
        self.chunks.clear();
        self.blob = Some(blob);
    }

    pub fn blob(&self) -> Option<&AudioBlob> {
        self.blob.as_ref()
    }

    pub fn has_buffer(&self) -> bool {
        self.blob.is_some()
    }
}
