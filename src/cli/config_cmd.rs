//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, RemoteConfig, StorageBackend};
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;
    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;
    store.save(&config).await?;

    let shown = if key == "remote.api_key" {
        mask_api_key(value)
    } else {
        value.to_string()
    };
    presenter.success(&format!("{} = {}", key, shown));
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;
    let config = store.load().await?;

    match display_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(
            key,
            &display_value(&config, key).unwrap_or_else(|| "(not set)".to_string()),
        );
    }
    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

/// Printable value for `key`, with the API key masked
fn display_value(config: &AppConfig, key: &str) -> Option<String> {
    let remote = config.remote.as_ref();
    match key {
        "storage" => config.storage.clone(),
        "media_dir" => config.media_dir.clone(),
        "max_duration" => config.max_duration.clone(),
        "waveform_bars" => config.waveform_bars.map(|n| n.to_string()),
        "frame_rate" => config.frame_rate.map(|n| n.to_string()),
        "quota_bytes" => config.quota_bytes.map(|n| n.to_string()),
        "remote.endpoint" => remote.and_then(|r| r.endpoint.clone()),
        "remote.bucket" => remote.and_then(|r| r.bucket.clone()),
        "remote.api_key" => remote.and_then(|r| r.api_key.as_deref()).map(mask_api_key),
        _ => None,
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.into(),
    }
}

fn parse_in_range(key: &str, value: &str, min: u32, max: u32) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|n| (min..=max).contains(n))
        .ok_or_else(|| invalid(key, format!("Value must be a number from {} to {}", min, max)))
}

/// Validate `value` for `key` and write it into `config`
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "storage" => {
            let backend = value
                .parse::<StorageBackend>()
                .map_err(|e| invalid(key, e.to_string()))?;
            config.storage = Some(backend.to_string());
        }
        "media_dir" => {
            if value.trim().is_empty() {
                return Err(invalid(key, "Path must not be empty"));
            }
            config.media_dir = Some(value.to_string());
        }
        "max_duration" => {
            value
                .parse::<Duration>()
                .map_err(|e| invalid(key, e.to_string()))?;
            config.max_duration = Some(value.to_string());
        }
        "waveform_bars" => config.waveform_bars = Some(parse_in_range(key, value, 1, 128)?),
        "frame_rate" => config.frame_rate = Some(parse_in_range(key, value, 1, 240)?),
        "quota_bytes" => {
            let quota = value
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid(key, "Value must be a whole number of bytes"))?;
            config.quota_bytes = Some(quota);
        }
        "remote.endpoint" => {
            let url = value.trim().trim_end_matches('/');
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(invalid(key, "Endpoint must start with http:// or https://"));
            }
            remote_mut(config).endpoint = Some(url.to_string());
        }
        "remote.bucket" => {
            if value.trim().is_empty() || value.contains('/') {
                return Err(invalid(key, "Bucket must be a non-empty name without '/'"));
            }
            remote_mut(config).bucket = Some(value.trim().to_string());
        }
        "remote.api_key" => remote_mut(config).api_key = Some(value.to_string()),
        _ => return Err(invalid(key, "Unknown key")),
    }
    Ok(())
}

fn remote_mut(config: &mut AppConfig) -> &mut RemoteConfig {
    config.remote.get_or_insert_with(RemoteConfig::default)
}

/// Mask API key for display (show first 4 and last 4 chars)
fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(key: &str, value: &str) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfig::empty();
        apply_value(&mut config, key, value)?;
        Ok(config)
    }

    #[test]
    fn mask_api_key_long() {
        assert_eq!(mask_api_key("abcdefghijklmnop"), "abcd...mnop");
    }

    #[test]
    fn mask_api_key_short() {
        assert_eq!(mask_api_key("short"), "*****");
    }

    #[test]
    fn storage_is_normalized() {
        let config = set("storage", " Remote ").unwrap();
        assert_eq!(config.storage.as_deref(), Some("remote"));
        assert!(set("storage", "s3").is_err());
    }

    #[test]
    fn max_duration_validated() {
        assert!(set("max_duration", "2m30s").is_ok());
        assert!(set("max_duration", "forever").is_err());
    }

    #[test]
    fn numeric_ranges() {
        assert_eq!(set("waveform_bars", "32").unwrap().waveform_bars, Some(32));
        assert!(set("waveform_bars", "0").is_err());
        assert!(set("waveform_bars", "129").is_err());
        assert_eq!(set("frame_rate", "60").unwrap().frame_rate, Some(60));
        assert!(set("frame_rate", "fast").is_err());
        assert_eq!(set("quota_bytes", "1048576").unwrap().quota_bytes, Some(1_048_576));
        assert!(set("quota_bytes", "-1").is_err());
    }

    #[test]
    fn remote_endpoint_requires_http() {
        let config = set("remote.endpoint", "https://x.supabase.co/").unwrap();
        assert_eq!(config.remote_endpoint(), Some("https://x.supabase.co"));
        assert!(set("remote.endpoint", "x.supabase.co").is_err());
    }

    #[test]
    fn remote_fields_create_table() {
        let config = set("remote.bucket", "notes").unwrap();
        assert_eq!(config.remote_bucket_or_default(), "notes");
        assert!(set("remote.bucket", "a/b").is_err());
    }

    #[test]
    fn api_key_is_masked_when_shown() {
        let config = set("remote.api_key", "abcdefghijklmnop").unwrap();
        assert_eq!(
            display_value(&config, "remote.api_key").as_deref(),
            Some("abcd...mnop")
        );
    }

    #[test]
    fn every_key_is_displayable() {
        let config = AppConfig::defaults();
        assert_eq!(display_value(&config, "storage").as_deref(), Some("local"));
        for key in VALID_CONFIG_KEYS {
            let _ = display_value(&config, key);
        }
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(check_key("api_key").is_err());
        assert!(check_key("remote.endpoint").is_ok());
    }
}
