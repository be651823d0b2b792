//! CLI presenter for output formatting

use colored::*;

use crate::domain::session::SessionPhase;

/// Presenter for CLI output formatting.
///
/// Status lines go to stderr; recognized text and config values go to stdout
/// so they can be piped.
pub struct Presenter;

impl Presenter {
    pub fn new() -> Self {
        Self
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

    /// Output text to stdout (recognized text, config values)
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print daemon status
    pub fn daemon_status(&self, state: &str) {
        eprintln!("{} Daemon: {}", "●".cyan(), state);
    }

    /// Print the session phase reported by the daemon
    pub fn session_phase(&self, phase: &str) {
        let colored = match phase.parse::<SessionPhase>() {
            Ok(SessionPhase::Recording) => phase.red().bold(),
            Ok(SessionPhase::Recognizing) => phase.yellow().bold(),
            Ok(SessionPhase::Error) => phase.red(),
            Ok(_) => phase.green(),
            Err(_) => phase.normal(),
        };
        eprintln!("{} Session: {}", "●".cyan(), colored);
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
