//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::action::HotkeyAction;
use crate::domain::output::OutputMode;

/// Sayble - push-to-talk dictation
#[derive(Parser, Debug)]
#[command(name = "sayble")]
#[command(version)]
#[command(about = "Push-to-talk dictation driven by an external streaming speech recognizer")]
#[command(long_about = None)]
pub struct Cli {
    /// Run as daemon (control via: sayble daemon toggle/stop/cancel/status)
    #[arg(long)]
    pub daemon: bool,

    /// How recognized text reaches the focused window
    #[arg(short = 'o', long, value_name = "MODE")]
    pub output_mode: Option<OutputModeArg>,

    /// Keep recognized text for `sayble daemon copy` instead of writing it
    #[arg(long)]
    pub no_auto_output: bool,

    /// Input device passed to the recognizer
    #[arg(long, value_name = "NAME")]
    pub device: Option<String>,

    /// Recognizer command (program and leading arguments)
    #[arg(long, value_name = "COMMAND")]
    pub recognizer: Option<String>,

    /// Do not show the floating indicator
    #[arg(long)]
    pub no_display: bool,

    /// Show desktop notifications
    #[arg(short = 'n', long)]
    pub notify: bool,

    /// Safety limit for a single recording
    #[arg(long, value_name = "TIME")]
    pub max_duration: Option<String>,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Send commands to running daemon
    Daemon {
        #[command(subcommand)]
        action: DaemonAction,
    },
}

/// Daemon control actions
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonAction {
    /// Start if idle, stop if recording
    Toggle,
    /// Start recording
    Start,
    /// Stop recording and output the result
    Stop,
    /// Cancel current recording without output
    Cancel,
    /// Show the session phase
    Status,
    /// Copy the last recognized text to the clipboard
    Copy,
}

impl DaemonAction {
    /// Command sent over the IPC socket
    pub const fn as_command(&self) -> &'static str {
        match self {
            Self::Toggle => HotkeyAction::ToggleRecording.as_command(),
            Self::Start => HotkeyAction::StartRecording.as_command(),
            Self::Stop => HotkeyAction::StopRecording.as_command(),
            Self::Cancel => HotkeyAction::CancelRecording.as_command(),
            Self::Status => "status",
            Self::Copy => "copy",
        }
    }
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Output mode argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputModeArg {
    /// Paste through the clipboard
    Clipboard,
    /// Type the text key by key
    Keyboard,
}

impl From<OutputModeArg> for OutputMode {
    fn from(arg: OutputModeArg) -> Self {
        match arg {
            OutputModeArg::Clipboard => OutputMode::Clipboard,
            OutputModeArg::Keyboard => OutputMode::SimulateKeyboard,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "app_id",
    "access_key",
    "language",
    "auto_punctuation",
    "device",
    "recognizer_command",
    "output_mode",
    "auto_output",
    "notify",
    "min_recording",
    "max_duration",
    "display.enabled",
    "display.hide_delay",
    "display.error_hide_delay",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
