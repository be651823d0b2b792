//! Floating display status value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// What the floating indicator is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    #[default]
    Idle,
    Recording,
    Recognizing,
    Done,
    Error,
    Polishing,
    PolishError,
}

impl DisplayStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Recognizing => "recognizing",
            Self::Done => "done",
            Self::Error => "error",
            Self::Polishing => "polishing",
            Self::PolishError => "polish_error",
        }
    }

    /// Heading shown next to the status icon
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Recording => "Recording",
            Self::Recognizing => "Recognizing",
            Self::Done => "Done",
            Self::Error => "Error",
            Self::Polishing => "Polishing",
            Self::PolishError => "Polish failed",
        }
    }

    /// Every status except idle keeps the window on screen
    pub const fn is_visible(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Terminal states that hide themselves after a grace delay
    pub const fn is_settling(&self) -> bool {
        matches!(self, Self::Done | Self::Error | Self::PolishError)
    }

    /// States whose grace delay is the longer error delay
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Error | Self::PolishError)
    }

    /// The user may still cancel from these states
    pub const fn is_cancellable(&self) -> bool {
        matches!(self, Self::Recording | Self::Recognizing)
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
