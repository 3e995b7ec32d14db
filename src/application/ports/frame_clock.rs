//! Frame clock port interface

use async_trait::async_trait;

/// Source of display frames.
///
/// The amplitude sampler runs once per frame of this clock, so the waveform
/// follows whatever surface is drawing it rather than a wall-clock timer.
pub trait FrameClock: Send + Sync {
    /// Begin a frame sequence for one capture session
    fn frames(&self) -> Box<dyn Frames>;
}

/// A sequence of frames owned by a single sampler
#[async_trait]
pub trait Frames: Send {
    /// Wait for the next frame. Returns false once the display is gone.
    async fn next_frame(&mut self) -> bool;
}
