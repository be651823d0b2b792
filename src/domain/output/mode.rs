//! Output mode value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::InvalidOutputModeError;

/// All available output modes
pub const ALL_OUTPUT_MODES: &[OutputMode] = &[OutputMode::Clipboard, OutputMode::SimulateKeyboard];

/// How a committed transcript reaches the focused application.
///
/// The serialized names (`Clipboard`, `SimulateKeyboard`) are the ones carried
/// by display control messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OutputMode {
    /// Put the text on the clipboard and paste it
    #[default]
    Clipboard,
    /// Type the text as synthetic keystrokes
    SimulateKeyboard,
}

impl OutputMode {
    /// Get the config string for this mode
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Clipboard => "clipboard",
            Self::SimulateKeyboard => "keyboard",
        }
    }
}

impl FromStr for OutputMode {
    type Err = InvalidOutputModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clipboard" => Ok(Self::Clipboard),
            "keyboard" | "simulate-keyboard" | "simulatekeyboard" => Ok(Self::SimulateKeyboard),
            _ => Err(InvalidOutputModeError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output policy applied when a session produces its final text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputPolicy {
    pub mode: OutputMode,
    /// When false the text is only kept for a manual copy
    pub auto_output: bool,
}

impl Default for OutputPolicy {
    fn default() -> Self {
        Self {
            mode: OutputMode::Clipboard,
            auto_output: true,
        }
    }
}
