//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, DisplayConfig};
use crate::domain::error::ConfigError;
use crate::domain::output::OutputMode;
use crate::domain::recording::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

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

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    ensure_valid_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;
    store.save(&config).await?;

    let shown = if key == "access_key" {
        mask_secret(value)
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
    ensure_valid_key(key)?;

    let config = store.load().await?;
    presenter.output(&display_value(&config, key).unwrap_or_else(|| NOT_SET.to_string()));
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(
            key,
            &display_value(&config, key).unwrap_or_else(|| NOT_SET.to_string()),
        );
    }
    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn ensure_valid_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

/// Validate `value` for `key` and store it in `config`
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };
    let boolean = || parse_bool(value).map_err(|_| invalid("Value must be 'true' or 'false'".to_string()));
    let duration = || {
        value
            .parse::<Duration>()
            .map(|d| d.to_string())
            .map_err(|e| invalid(e.to_string()))
    };
    let text = || {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Err(invalid("Value must not be empty".to_string()))
        } else {
            Ok(trimmed.to_string())
        }
    };

    match key {
        "app_id" => config.app_id = Some(text()?),
        "access_key" => config.access_key = Some(text()?),
        "language" => config.language = Some(text()?),
        "auto_punctuation" => config.auto_punctuation = Some(boolean()?),
        "device" => config.device = Some(text()?),
        "recognizer_command" => config.recognizer_command = Some(text()?),
        "output_mode" => {
            let mode = value
                .parse::<OutputMode>()
                .map_err(|e| invalid(e.to_string()))?;
            config.output_mode = Some(mode.as_str().to_string());
        }
        "auto_output" => config.auto_output = Some(boolean()?),
        "notify" => config.notify = Some(boolean()?),
        "min_recording" => config.min_recording = Some(duration()?),
        "max_duration" => config.max_duration = Some(duration()?),
        "display.enabled" => display_mut(config).enabled = Some(boolean()?),
        "display.hide_delay" => display_mut(config).hide_delay = Some(duration()?),
        "display.error_hide_delay" => display_mut(config).error_hide_delay = Some(duration()?),
        _ => return Err(invalid("Unknown key".to_string())),
    }
    Ok(())
}

fn display_mut(config: &mut AppConfig) -> &mut DisplayConfig {
    config.display.get_or_insert_with(DisplayConfig::default)
}

/// Stored value of `key` as shown to the user; secrets are masked
fn display_value(config: &AppConfig, key: &str) -> Option<String> {
    let display = config.display.as_ref();
    match key {
        "app_id" => config.app_id.clone(),
        "access_key" => config.access_key.as_deref().map(mask_secret),
        "language" => config.language.clone(),
        "auto_punctuation" => config.auto_punctuation.map(|b| b.to_string()),
        "device" => config.device.clone(),
        "recognizer_command" => config.recognizer_command.clone(),
        "output_mode" => config.output_mode.clone(),
        "auto_output" => config.auto_output.map(|b| b.to_string()),
        "notify" => config.notify.map(|b| b.to_string()),
        "min_recording" => config.min_recording.clone(),
        "max_duration" => config.max_duration.clone(),
        "display.enabled" => display.and_then(|d| d.enabled).map(|b| b.to_string()),
        "display.hide_delay" => display.and_then(|d| d.hide_delay.clone()),
        "display.error_hide_delay" => display.and_then(|d| d.error_hide_delay.clone()),
        _ => None,
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

/// Mask a secret for display (show first 4 and last 4 chars)
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}
