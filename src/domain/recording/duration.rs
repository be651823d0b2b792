//! Duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Minimum recording length before the recognizer is told to stop (800 milliseconds).
/// Shorter utterances do not give the recognizer enough audio to produce a result.
pub const DEFAULT_MIN_RECORDING_MS: u64 = 800;

/// Safety limit for a single recording (5 minutes)
pub const DEFAULT_MAX_DURATION_SECS: u64 = 300;

/// Grace period the floating display stays visible after a result (1 second)
pub const DEFAULT_HIDE_DELAY_MS: u64 = 1_000;

/// Grace period the floating display stays visible after an error (3 seconds)
pub const DEFAULT_ERROR_HIDE_DELAY_MS: u64 = 3_000;

/// Value object representing a time duration.
/// Immutable and validated on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    /// Create a Duration from milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    /// Create a Duration from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * 1000,
        }
    }

    /// Default minimum recording duration (800 milliseconds)
    pub const fn default_min_recording() -> Self {
        Self::from_millis(DEFAULT_MIN_RECORDING_MS)
    }

    /// Default max duration for a single recording (5 minutes)
    pub const fn default_max_duration() -> Self {
        Self::from_secs(DEFAULT_MAX_DURATION_SECS)
    }

    /// Default display grace delay after a result (1 second)
    pub const fn default_hide_delay() -> Self {
        Self::from_millis(DEFAULT_HIDE_DELAY_MS)
    }

    /// Default display grace delay after an error (3 seconds)
    pub const fn default_error_hide_delay() -> Self {
        Self::from_millis(DEFAULT_ERROR_HIDE_DELAY_MS)
    }

    /// Get duration in seconds
    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    /// Get duration in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse a duration string into a Duration value object.
    /// Supported formats: "800ms", "30s", "1m", "2m30s", "90s"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let invalid = || DurationParseError {
            input: s.to_string(),
        };

        // Millisecond form stands alone: "800ms"
        if let Some(ms) = input.strip_suffix("ms") {
            if ms.is_empty() || !ms.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            let milliseconds: u64 = ms.parse().map_err(|_| invalid())?;
            if milliseconds == 0 {
                return Err(invalid());
            }
            return Ok(Self { milliseconds });
        }

        let mut minutes: u64 = 0;
        let mut seconds: u64 = 0;
        let mut current_num = String::new();
        let mut found_any = false;

        for ch in input.chars() {
            if ch.is_ascii_digit() {
                current_num.push(ch);
            } else if ch == 'm' && !current_num.is_empty() {
                minutes = current_num.parse().map_err(|_| invalid())?;
                current_num.clear();
                found_any = true;
            } else if ch == 's' && !current_num.is_empty() {
                seconds = current_num.parse().map_err(|_| invalid())?;
                current_num.clear();
                found_any = true;
            } else {
                return Err(invalid());
            }
        }

        // Handle case where there's leftover numbers (invalid format)
        if !current_num.is_empty() || !found_any {
            return Err(invalid());
        }

        let total_ms = (minutes * 60 + seconds) * 1000;

        if total_ms == 0 {
            return Err(invalid());
        }

        Ok(Self {
            milliseconds: total_ms,
        })
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.milliseconds % 1000 != 0 {
            return write!(f, "{}ms", self.milliseconds);
        }

        let total_secs = self.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;

        if minutes == 0 {
            write!(f, "{}s", seconds)
        } else if seconds == 0 {
            write!(f, "{}m", minutes)
        } else {
            write!(f, "{}m{}s", minutes, seconds)
        }
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_min_recording()
    }
}
