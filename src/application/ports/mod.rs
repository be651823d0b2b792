//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod clipboard;
pub mod config;
pub mod display;
pub mod keystroke;
pub mod notifier;
pub mod output;
pub mod recognizer;

// Re-export common types
pub use clipboard::{Clipboard, ClipboardError};
pub use config::ConfigStore;
pub use display::{DisplayError, DisplaySurface};
pub use keystroke::{Keystroke, KeystrokeError};
pub use notifier::{Notice, NotificationError, Notifier};
pub use output::{OutputError, OutputSink};
pub use recognizer::{Recognizer, RecognizerError};
