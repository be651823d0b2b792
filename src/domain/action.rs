//! Recording intents and display control messages

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::output::OutputMode;
use crate::domain::session::Generation;

/// Intent delivered by a trigger (hotkey, IPC command, display button).
///
/// Triggers make no ordering or dedup promise; the controller interprets each
/// intent against its current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyAction {
    StartRecording,
    StopRecording,
    CancelRecording,
    ToggleRecording,
}

impl HotkeyAction {
    /// Name used on the IPC wire
    pub const fn as_command(&self) -> &'static str {
        match self {
            Self::StartRecording => "start",
            Self::StopRecording => "stop",
            Self::CancelRecording => "cancel",
            Self::ToggleRecording => "toggle",
        }
    }
}

impl FromStr for HotkeyAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "start" => Ok(Self::StartRecording),
            "stop" => Ok(Self::StopRecording),
            "cancel" => Ok(Self::CancelRecording),
            "toggle" => Ok(Self::ToggleRecording),
            other => Err(format!("unknown action: {}", other)),
        }
    }
}

impl fmt::Display for HotkeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_command())
    }
}

/// Action carried by a display control message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    Start,
    Stop,
    Cancel,
}

/// Explicit instruction from the controller to the floating display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlMessage {
    pub action: ControlAction,
    /// Session the instruction refers to; lets the display ignore events of an
    /// older session that are still in flight
    #[serde(rename = "sessionId", default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<Generation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_mode: Option<OutputMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_output: Option<bool>,
}

impl ControlMessage {
    pub fn start(generation: Generation, output_mode: OutputMode, auto_output: bool) -> Self {
        Self {
            action: ControlAction::Start,
            generation: Some(generation),
            output_mode: Some(output_mode),
            auto_output: Some(auto_output),
        }
    }

    pub fn stop(generation: Generation) -> Self {
        Self {
            action: ControlAction::Stop,
            generation: Some(generation),
            output_mode: None,
            auto_output: None,
        }
    }

    pub fn cancel(generation: Generation) -> Self {
        Self {
            action: ControlAction::Cancel,
            generation: Some(generation),
            output_mode: None,
            auto_output: None,
        }
    }
}
