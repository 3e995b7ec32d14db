//! Amplitude reduction for the live waveform

use std::collections::VecDeque;

/// Number of bars published per frame unless configured otherwise
pub const DEFAULT_BAR_COUNT: usize = 20;

/// Frames of peak history kept per session
pub const DEFAULT_HISTORY_LEN: usize = 256;

fn normalize(value: f32) -> f32 {
    if value.is_finite() {
        value.abs().clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Reduce a raw amplitude window to `bars` values in [0, 1].
///
/// The window is split into equal buckets and each bucket is averaged.
/// An empty window yields silence.
pub fn reduce_to_bars(window: &[f32], bars: usize) -> Vec<f32> {
    if bars == 0 {
        return Vec::new();
    }
    if window.is_empty() {
        return vec![0.0; bars];
    }

    let len = window.len();
    (0..bars)
        .map(|i| {
            let start = i * len / bars;
            let end = ((i + 1) * len / bars).clamp(start + 1, len);
            let bucket = &window[start..end];
            let sum: f32 = bucket.iter().map(|&v| normalize(v)).sum();
            normalize(sum / bucket.len() as f32)
        })
        .collect()
}

/// Bounded, ordered history of per-frame peaks
#[derive(Debug, Clone)]
pub struct AmplitudeHistory {
    capacity: usize,
    samples: VecDeque<f32>,
}

impl AmplitudeHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Record one frame, evicting the oldest sample when full
    pub fn push(&mut self, sample: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(normalize(sample));
    }

    /// Record the peak of a bar vector
    pub fn push_frame(&mut self, bars: &[f32]) {
        let peak = bars.iter().copied().fold(0.0_f32, f32::max);
        self.push(peak);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Oldest-first copy of the history
    pub fn to_vec(&self) -> Vec<f32> {
        self.samples.iter().copied().collect()
    }
}

impl Default for AmplitudeHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_is_silence() {
        assert_eq!(reduce_to_bars(&[], 4), vec![0.0; 4]);
    }

    #[test]
    fn zero_bars_is_empty() {
        assert!(reduce_to_bars(&[0.5, 0.5], 0).is_empty());
    }

    #[test]
    fn buckets_are_averaged() {
        let window = [0.0, 1.0, 0.5, 0.5];
        assert_eq!(reduce_to_bars(&window, 2), vec![0.5, 0.5]);
    }

    #[test]
    fn output_is_clamped_to_unit_range() {
        let window = [-3.0, 2.0, f32::NAN, f32::INFINITY];
        let bars = reduce_to_bars(&window, 4);
        assert_eq!(bars, vec![1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn short_window_repeats_samples() {
        let bars = reduce_to_bars(&[0.2, 0.8], DEFAULT_BAR_COUNT);
        assert_eq!(bars.len(), DEFAULT_BAR_COUNT);
        assert!(bars.iter().all(|&b| b == 0.2 || b == 0.8));
    }

    #[test]
    fn history_is_bounded() {
        let mut history = AmplitudeHistory::new(3);
        for v in [0.1, 0.2, 0.3, 0.4] {
            history.push(v);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.to_vec(), vec![0.2, 0.3, 0.4]);
    }

    #[test]
    fn history_records_frame_peak() {
        let mut history = AmplitudeHistory::default();
        history.push_frame(&[0.1, 0.7, 0.3]);
        assert_eq!(history.to_vec(), vec![0.7]);
        history.clear();
        assert!(history.is_empty());
    }
}
