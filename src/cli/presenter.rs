//! CLI presenter for output formatting

use std::io::{self, Write};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::recording::format_clock;

/// Block characters from quietest to loudest
const WAVE_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.red} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout (machine-readable results)
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Prompt on stderr without a trailing newline
    pub fn prompt(&self, text: &str) {
        eprint!("{} ", text.bold());
        let _ = io::stderr().flush();
    }

    /// Render bar levels in [0, 1] as block glyphs
    pub fn format_waveform(&self, levels: &[f32]) -> String {
        levels
            .iter()
            .map(|&level| {
                let level = if level.is_finite() { level.clamp(0.0, 1.0) } else { 0.0 };
                let idx = (level * (WAVE_GLYPHS.len() - 1) as f32).round() as usize;
                WAVE_GLYPHS[idx]
            })
            .collect()
    }

    /// Format the live recording line: waveform plus elapsed / max clock
    pub fn format_recording(&self, levels: &[f32], elapsed_secs: u64, max_secs: u64) -> String {
        format!(
            "Recording {} {} / {}",
            self.format_waveform(levels).cyan(),
            format_clock(elapsed_secs),
            format_clock(max_secs)
        )
    }

    /// Show the recording spinner
    pub fn show_recording(&mut self) {
        self.start_spinner("Recording... (press Enter to stop)");
    }

    /// Update recording display
    pub fn update_recording(&self, levels: &[f32], elapsed_secs: u64, max_secs: u64) {
        let line = self.format_recording(levels, elapsed_secs, max_secs);
        self.update_spinner(&line);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waveform_maps_extremes() {
        let presenter = Presenter::new();
        assert_eq!(presenter.format_waveform(&[0.0, 1.0]), "▁█");
    }

    #[test]
    fn waveform_clamps_out_of_range() {
        let presenter = Presenter::new();
        assert_eq!(presenter.format_waveform(&[-1.0, 2.0, f32::NAN]), "▁█▁");
    }

    #[test]
    fn waveform_has_one_glyph_per_bar() {
        let presenter = Presenter::new();
        let levels = vec![0.5; 20];
        assert_eq!(presenter.format_waveform(&levels).chars().count(), 20);
    }

    #[test]
    fn recording_line_shows_clock() {
        colored::control::set_override(false);
        let presenter = Presenter::new();
        let line = presenter.format_recording(&[0.0], 65, 600);
        assert!(line.contains("1:05 / 10:00"));
    }
}
