//! Fixed-rate frame clock for terminal rendering

use async_trait::async_trait;
use tokio::time::{interval, Duration, Interval, MissedTickBehavior};

use crate::application::ports::{FrameClock, Frames};
use crate::domain::config::DEFAULT_FRAME_RATE;

/// Frame clock ticking at a fixed rate; late frames are skipped, not bunched
#[derive(Debug, Clone, Copy)]
pub struct IntervalFrameClock {
    period: Duration,
}

impl IntervalFrameClock {
    /// Clock running at `fps` frames per second (clamped to 1..=240)
    pub fn new(fps: u32) -> Self {
        let fps = fps.clamp(1, 240);
        Self {
            period: Duration::from_secs(1) / fps,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Default for IntervalFrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_RATE)
    }
}

struct IntervalFrames(Interval);

#[async_trait]
impl Frames for IntervalFrames {
    async fn next_frame(&mut self) -> bool {
        self.0.tick().await;
        true
    }
}

impl FrameClock for IntervalFrameClock {
    fn frames(&self) -> Box<dyn Frames> {
        let mut ticks = interval(self.period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Box::new(IntervalFrames(ticks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_follows_frame_rate() {
        assert_eq!(IntervalFrameClock::new(50).period(), Duration::from_millis(20));
        assert_eq!(IntervalFrameClock::new(0).period(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn frames_tick_at_period() {
        let clock = IntervalFrameClock::new(10);
        let mut frames = clock.frames();
        let start = tokio::time::Instant::now();

        // First frame is immediate
        assert!(frames.next_frame().await);
        assert!(frames.next_frame().await);
        assert!(frames.next_frame().await);

        assert_eq!(start.elapsed(), Duration::from_millis(200));
    }
}
