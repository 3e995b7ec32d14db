//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::StorageBackend;
use crate::domain::recording::{Duration, DEFAULT_BAR_COUNT};

/// Default bucket for the remote media store
pub const DEFAULT_BUCKET: &str = "journal-media";

/// Default waveform redraw rate (frames per second)
pub const DEFAULT_FRAME_RATE: u32 = 30;

/// Remote storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub endpoint: Option<String>,
    pub bucket: Option<String>,
    pub api_key: Option<String>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: Option<String>,
    pub media_dir: Option<String>,
    pub max_duration: Option<String>,
    pub waveform_bars: Option<u32>,
    pub frame_rate: Option<u32>,
    pub quota_bytes: Option<u64>,
    pub remote: Option<RemoteConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            storage: Some("local".to_string()),
            media_dir: None,
            max_duration: Some("10m".to_string()),
            waveform_bars: Some(DEFAULT_BAR_COUNT as u32),
            frame_rate: Some(DEFAULT_FRAME_RATE),
            quota_bytes: None,
            remote: Some(RemoteConfig {
                endpoint: None,
                bucket: Some(DEFAULT_BUCKET.to_string()),
                api_key: None,
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            storage: other.storage.or(self.storage),
            media_dir: other.media_dir.or(self.media_dir),
            max_duration: other.max_duration.or(self.max_duration),
            waveform_bars: other.waveform_bars.or(self.waveform_bars),
            frame_rate: other.frame_rate.or(self.frame_rate),
            quota_bytes: other.quota_bytes.or(self.quota_bytes),
            remote: Self::merge_remote_config(self.remote, other.remote),
        }
    }

    fn merge_remote_config(
        base: Option<RemoteConfig>,
        other: Option<RemoteConfig>,
    ) -> Option<RemoteConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(RemoteConfig {
                endpoint: o.endpoint.or(b.endpoint),
                bucket: o.bucket.or(b.bucket),
                api_key: o.api_key.or(b.api_key),
            }),
        }
    }

    /// Get storage backend, or local if not set/invalid
    pub fn storage_or_default(&self) -> StorageBackend {
        self.storage
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get max_duration as parsed Duration, or default if not set/invalid
    pub fn max_duration_or_default(&self) -> Duration {
        self.max_duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_max_duration)
    }

    /// Bars per waveform frame, clamped to 1..=128
    pub fn waveform_bars_or_default(&self) -> usize {
        self.waveform_bars
            .map(|n| n.clamp(1, 128) as usize)
            .unwrap_or(DEFAULT_BAR_COUNT)
    }

    /// Waveform frames per second, clamped to 1..=240
    pub fn frame_rate_or_default(&self) -> u32 {
        self.frame_rate
            .map(|n| n.clamp(1, 240))
            .unwrap_or(DEFAULT_FRAME_RATE)
    }

    /// Configured media directory, if any
    pub fn media_dir(&self) -> Option<PathBuf> {
        self.media_dir.as_ref().map(PathBuf::from)
    }

    pub fn remote_endpoint(&self) -> Option<&str> {
        self.remote.as_ref().and_then(|r| r.endpoint.as_deref())
    }

    pub fn remote_api_key(&self) -> Option<&str> {
        self.remote.as_ref().and_then(|r| r.api_key.as_deref())
    }

    pub fn remote_bucket_or_default(&self) -> &str {
        self.remote
            .as_ref()
            .and_then(|r| r.bucket.as_deref())
            .unwrap_or(DEFAULT_BUCKET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.storage_or_default(), StorageBackend::Local);
        assert_eq!(config.max_duration_or_default().as_secs(), 600);
        assert_eq!(config.waveform_bars_or_default(), 20);
        assert_eq!(config.frame_rate_or_default(), 30);
        assert_eq!(config.remote_bucket_or_default(), "journal-media");
        assert!(config.remote_endpoint().is_none());
        assert!(config.media_dir().is_none());
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.storage.is_none());
        assert!(config.max_duration.is_none());
        assert!(config.remote.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            storage: Some("local".to_string()),
            max_duration: Some("5m".to_string()),
            ..Default::default()
        };
        let other = AppConfig {
            storage: Some("remote".to_string()),
            max_duration: None,
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.storage_or_default(), StorageBackend::Remote);
        assert_eq!(merged.max_duration_or_default().as_secs(), 300);
    }

    #[test]
    fn merge_remote_config_field_by_field() {
        let base = AppConfig {
            remote: Some(RemoteConfig {
                endpoint: Some("https://a.example".to_string()),
                bucket: Some("base".to_string()),
                api_key: None,
            }),
            ..Default::default()
        };
        let other = AppConfig {
            remote: Some(RemoteConfig {
                api_key: Some("secret".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.remote_endpoint(), Some("https://a.example"));
        assert_eq!(merged.remote_bucket_or_default(), "base");
        assert_eq!(merged.remote_api_key(), Some("secret"));
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = AppConfig {
            storage: Some("ftp".to_string()),
            max_duration: Some("forever".to_string()),
            ..Default::default()
        };
        assert_eq!(config.storage_or_default(), StorageBackend::Local);
        assert_eq!(config.max_duration_or_default().as_secs(), 600);
    }

    #[test]
    fn numeric_settings_are_clamped() {
        let config = AppConfig {
            waveform_bars: Some(0),
            frame_rate: Some(1000),
            ..Default::default()
        };
        assert_eq!(config.waveform_bars_or_default(), 1);
        assert_eq!(config.frame_rate_or_default(), 240);
    }
}
