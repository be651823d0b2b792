//! Session phase value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Recording session phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Recording,
    Recognizing,
    Done,
    Error,
}

impl SessionPhase {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Recognizing => "recognizing",
            Self::Done => "done",
            Self::Error => "error",
        }
    }

    /// Audio is being captured or the recognizer is still working on it
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Recording | Self::Recognizing)
    }

    /// No recognizer work is outstanding; a new recording may begin
    pub const fn is_settled(&self) -> bool {
        !self.is_active()
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SessionPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "idle" => Ok(Self::Idle),
            "recording" => Ok(Self::Recording),
            "recognizing" => Ok(Self::Recognizing),
            "done" => Ok(Self::Done),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown phase: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_display() {
        assert_eq!(SessionPhase::Idle.to_string(), "idle");
        assert_eq!(SessionPhase::Recording.to_string(), "recording");
        assert_eq!(SessionPhase::Recognizing.to_string(), "recognizing");
        assert_eq!(SessionPhase::Done.to_string(), "done");
        assert_eq!(SessionPhase::Error.to_string(), "error");
    }

    #[test]
    fn phase_parses_its_own_name() {
        assert_eq!("recognizing".parse::<SessionPhase>(), Ok(SessionPhase::Recognizing));
        assert!("paused".parse::<SessionPhase>().is_err());
    }

    #[test]
    fn active_and_settled_partition_phases() {
        assert!(SessionPhase::Recording.is_active());
        assert!(SessionPhase::Recognizing.is_active());
        assert!(SessionPhase::Idle.is_settled());
        assert!(SessionPhase::Done.is_settled());
        assert!(SessionPhase::Error.is_settled());
    }
}
