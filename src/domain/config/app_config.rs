//! Application configuration value object

use serde::{Deserialize, Serialize};

use super::credentials::Credentials;
use crate::domain::error::MissingCredentials;
use crate::domain::output::{OutputMode, OutputPolicy};
use crate::domain::recording::Duration;

/// Recognition language used when none is configured
pub const DEFAULT_LANGUAGE: &str = "zh";

/// Recognizer executable looked up on PATH when none is configured
pub const DEFAULT_RECOGNIZER_COMMAND: &str = "sayble-recognizer";

/// Floating display configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub enabled: Option<bool>,
    pub hide_delay: Option<String>,
    pub error_hide_delay: Option<String>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub app_id: Option<String>,
    pub access_key: Option<String>,
    pub language: Option<String>,
    pub auto_punctuation: Option<bool>,
    pub device: Option<String>,
    pub recognizer_command: Option<String>,
    pub output_mode: Option<String>,
    pub auto_output: Option<bool>,
    pub notify: Option<bool>,
    pub min_recording: Option<String>,
    pub max_duration: Option<String>,
    pub display: Option<DisplayConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            app_id: None,
            access_key: None,
            language: Some(DEFAULT_LANGUAGE.to_string()),
            auto_punctuation: Some(true),
            device: None,
            recognizer_command: Some(DEFAULT_RECOGNIZER_COMMAND.to_string()),
            output_mode: Some(OutputMode::default().as_str().to_string()),
            auto_output: Some(true),
            notify: Some(false),
            min_recording: Some(Duration::default_min_recording().to_string()),
            max_duration: Some(Duration::default_max_duration().to_string()),
            display: Some(DisplayConfig {
                enabled: Some(true),
                hide_delay: Some(Duration::default_hide_delay().to_string()),
                error_hide_delay: Some(Duration::default_error_hide_delay().to_string()),
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
            app_id: other.app_id.or(self.app_id),
            access_key: other.access_key.or(self.access_key),
            language: other.language.or(self.language),
            auto_punctuation: other.auto_punctuation.or(self.auto_punctuation),
            device: other.device.or(self.device),
            recognizer_command: other.recognizer_command.or(self.recognizer_command),
            output_mode: other.output_mode.or(self.output_mode),
            auto_output: other.auto_output.or(self.auto_output),
            notify: other.notify.or(self.notify),
            min_recording: other.min_recording.or(self.min_recording),
            max_duration: other.max_duration.or(self.max_duration),
            display: Self::merge_display_config(self.display, other.display),
        }
    }

    fn merge_display_config(
        base: Option<DisplayConfig>,
        other: Option<DisplayConfig>,
    ) -> Option<DisplayConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(DisplayConfig {
                enabled: o.enabled.or(b.enabled),
                hide_delay: o.hide_delay.or(b.hide_delay),
                error_hide_delay: o.error_hide_delay.or(b.error_hide_delay),
            }),
        }
    }

    /// Build recognizer credentials.
    ///
    /// Blank values count as missing, so a half-filled config is rejected
    /// before anything is sent to the recognizer.
    pub fn credentials(&self) -> Result<Credentials, MissingCredentials> {
        let app_id = non_blank(self.app_id.as_deref()).ok_or(MissingCredentials)?;
        let access_key = non_blank(self.access_key.as_deref()).ok_or(MissingCredentials)?;
        Ok(Credentials::new(app_id, access_key)
            .with_language(self.language_or_default())
            .with_auto_punctuation(self.auto_punctuation_or_default()))
    }

    pub fn language_or_default(&self) -> &str {
        non_blank(self.language.as_deref()).unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn auto_punctuation_or_default(&self) -> bool {
        self.auto_punctuation.unwrap_or(true)
    }

    /// Selected input device; None means the system default
    pub fn device(&self) -> Option<&str> {
        non_blank(self.device.as_deref())
    }

    pub fn recognizer_command_or_default(&self) -> &str {
        non_blank(self.recognizer_command.as_deref()).unwrap_or(DEFAULT_RECOGNIZER_COMMAND)
    }

    /// Get output mode, or clipboard if not set/invalid
    pub fn output_mode_or_default(&self) -> OutputMode {
        self.output_mode
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn auto_output_or_default(&self) -> bool {
        self.auto_output.unwrap_or(true)
    }

    pub fn output_policy(&self) -> OutputPolicy {
        OutputPolicy {
            mode: self.output_mode_or_default(),
            auto_output: self.auto_output_or_default(),
        }
    }

    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }

    /// Get min_recording as parsed Duration, or default if not set/invalid
    pub fn min_recording_or_default(&self) -> Duration {
        self.min_recording
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_min_recording)
    }

    /// Get max_duration as parsed Duration, or default if not set/invalid
    pub fn max_duration_or_default(&self) -> Duration {
        self.max_duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_max_duration)
    }

    pub fn display_enabled_or_default(&self) -> bool {
        self.display
            .as_ref()
            .and_then(|d| d.enabled)
            .unwrap_or(true)
    }

    pub fn hide_delay_or_default(&self) -> Duration {
        self.display
            .as_ref()
            .and_then(|d| d.hide_delay.as_ref())
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_hide_delay)
    }

    pub fn error_hide_delay_or_default(&self) -> Duration {
        self.display
            .as_ref()
            .and_then(|d| d.error_hide_delay.as_ref())
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_error_hide_delay)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
