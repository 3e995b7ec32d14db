//! Recorder state machine

use std::fmt;
use thiserror::Error;

/// Playback sub-state, only meaningful while a finished buffer exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
}

/// Recorder states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecorderState {
    #[default]
    Idle,
    Recording,
    Stopped(PlaybackState),
}

impl RecorderState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Stopped(PlaybackState::Paused) => "stopped",
            Self::Stopped(PlaybackState::Playing) => "playing",
        }
    }
}

impl fmt::Display for RecorderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: RecorderState,
    pub action: String,
}

/// Recorder lifecycle.
///
/// State machine:
///   IDLE -> RECORDING (start)
///   RECORDING -> STOPPED (stop)
///   RECORDING -> IDLE (abort)
///   STOPPED -> IDLE (discard, save)
///   STOPPED(paused) <-> STOPPED(playing) (play, pause, playback_finished)
#[derive(Debug, Default)]
pub struct RecorderStateMachine {
    state: RecorderState,
}

impl RecorderStateMachine {
    /// Create a new state machine in idle state
    pub fn new() -> Self {
        Self {
            state: RecorderState::Idle,
        }
    }

    /// Get the current state
    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == RecorderState::Idle
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// True while a finished buffer is held (either playback sub-state)
    pub fn is_stopped(&self) -> bool {
        matches!(self.state, RecorderState::Stopped(_))
    }

    pub fn is_playing(&self) -> bool {
        self.state == RecorderState::Stopped(PlaybackState::Playing)
    }

    fn reject(&self, action: &str) -> InvalidStateTransition {
        InvalidStateTransition {
            current_state: self.state,
            action: action.to_string(),
        }
    }

    /// Check that recording may start, without transitioning
    pub fn ensure_can_start(&self) -> Result<(), InvalidStateTransition> {
        if self.state != RecorderState::Idle {
            return Err(self.reject("start recording"));
        }
        Ok(())
    }

    /// Transition from IDLE to RECORDING
    pub fn start(&mut self) -> Result<(), InvalidStateTransition> {
        self.ensure_can_start()?;
        self.state = RecorderState::Recording;
        Ok(())
    }

    /// Check that recording may stop, without transitioning
    pub fn ensure_can_stop(&self) -> Result<(), InvalidStateTransition> {
        if self.state != RecorderState::Recording {
            return Err(self.reject("stop recording"));
        }
        Ok(())
    }

    /// Transition from RECORDING to STOPPED
    pub fn stop(&mut self) -> Result<(), InvalidStateTransition> {
        self.ensure_can_stop()?;
        self.state = RecorderState::Stopped(PlaybackState::Paused);
        Ok(())
    }

    /// Transition from RECORDING to IDLE when the capture could not be finalized
    pub fn abort(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != RecorderState::Recording {
            return Err(self.reject("abort recording"));
        }
        self.state = RecorderState::Idle;
        Ok(())
    }

    /// Check that the finished buffer may be saved, without transitioning
    pub fn ensure_can_save(&self) -> Result<(), InvalidStateTransition> {
        if !self.is_stopped() {
            return Err(self.reject("save recording"));
        }
        Ok(())
    }

    /// Transition from STOPPED to IDLE after a successful save
    pub fn complete_save(&mut self) -> Result<(), InvalidStateTransition> {
        self.ensure_can_save()?;
        self.state = RecorderState::Idle;
        Ok(())
    }

    /// Transition from STOPPED to IDLE, dropping the buffer
    pub fn discard(&mut self) -> Result<(), InvalidStateTransition> {
        if !self.is_stopped() {
            return Err(self.reject("discard recording"));
        }
        self.state = RecorderState::Idle;
        Ok(())
    }

    /// Enter the playing sub-state
    pub fn play(&mut self) -> Result<(), InvalidStateTransition> {
        if !self.is_stopped() {
            return Err(self.reject("play recording"));
        }
        self.state = RecorderState::Stopped(PlaybackState::Playing);
        Ok(())
    }

    /// Enter the paused sub-state
    pub fn pause(&mut self) -> Result<(), InvalidStateTransition> {
        if !self.is_stopped() {
            return Err(self.reject("pause playback"));
        }
        self.state = RecorderState::Stopped(PlaybackState::Paused);
        Ok(())
    }

    /// Playback reached its end. Returns false when nothing was playing.
    pub fn playback_finished(&mut self) -> bool {
        if self.is_playing() {
            self.state = RecorderState::Stopped(PlaybackState::Paused);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stopped() -> RecorderStateMachine {
        let mut machine = RecorderStateMachine::new();
        machine.start().unwrap();
        machine.stop().unwrap();
        machine
    }

    #[test]
    fn new_machine_is_idle() {
        let machine = RecorderStateMachine::new();
        assert!(machine.is_idle());
        assert!(!machine.is_recording());
        assert!(!machine.is_stopped());
    }

    #[test]
    fn start_from_recording_fails() {
        let mut machine = RecorderStateMachine::new();
        machine.start().unwrap();

        let err = machine.start().unwrap_err();
        assert_eq!(err.current_state, RecorderState::Recording);
        assert!(err.action.contains("start recording"));
        assert!(machine.is_recording());
    }

    #[test]
    fn start_from_stopped_fails() {
        let mut machine = stopped();
        assert!(machine.start().is_err());
        assert!(machine.is_stopped());
    }

    #[test]
    fn stop_from_idle_fails() {
        let mut machine = RecorderStateMachine::new();
        let err = machine.stop().unwrap_err();
        assert_eq!(err.current_state, RecorderState::Idle);
        assert!(machine.is_idle());
    }

    #[test]
    fn stop_lands_in_paused_sub_state() {
        let machine = stopped();
        assert_eq!(machine.state(), RecorderState::Stopped(PlaybackState::Paused));
    }

    #[test]
    fn abort_only_from_recording() {
        let mut machine = RecorderStateMachine::new();
        assert!(machine.abort().is_err());
        machine.start().unwrap();
        machine.abort().unwrap();
        assert!(machine.is_idle());
    }

    #[test]
    fn discard_from_idle_and_recording_fails() {
        let mut machine = RecorderStateMachine::new();
        assert!(machine.discard().is_err());
        machine.start().unwrap();
        assert!(machine.discard().is_err());
        assert!(machine.is_recording());
    }

    #[test]
    fn discard_while_playing_returns_to_idle() {
        let mut machine = stopped();
        machine.play().unwrap();
        machine.discard().unwrap();
        assert!(machine.is_idle());
    }

    #[test]
    fn play_and_pause_only_with_buffer() {
        let mut machine = RecorderStateMachine::new();
        assert!(machine.play().is_err());
        assert!(machine.pause().is_err());

        let mut machine = stopped();
        machine.play().unwrap();
        assert!(machine.is_playing());
        machine.pause().unwrap();
        assert!(!machine.is_playing());
        assert!(machine.is_stopped());
    }

    #[test]
    fn playback_finished_returns_to_paused() {
        let mut machine = stopped();
        assert!(!machine.playback_finished());
        machine.play().unwrap();
        assert!(machine.playback_finished());
        assert_eq!(machine.state(), RecorderState::Stopped(PlaybackState::Paused));
    }

    #[test]
    fn full_cycle() {
        let mut machine = stopped();
        machine.complete_save().unwrap();
        assert!(machine.is_idle());

        machine.start().unwrap();
        assert!(machine.is_recording());
    }

    #[test]
    fn state_display() {
        assert_eq!(RecorderState::Idle.to_string(), "idle");
        assert_eq!(RecorderState::Recording.to_string(), "recording");
        assert_eq!(RecorderState::Stopped(PlaybackState::Paused).to_string(), "stopped");
        assert_eq!(RecorderState::Stopped(PlaybackState::Playing).to_string(), "playing");
    }

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: RecorderState::Idle,
            action: "stop recording".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("stop recording"));
        assert!(msg.contains("idle"));
    }
}
