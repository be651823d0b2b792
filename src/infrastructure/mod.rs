//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces: the recognizer
//! process, the system clipboard and keyboard, desktop notifications, the
//! terminal display surface and the XDG config store.

pub mod clipboard;
pub mod config;
pub mod display;
pub mod keystroke;
pub mod notification;
pub mod output;
pub mod recognizer;

// Re-export adapters
pub use clipboard::ArboardClipboard;
pub use config::XdgConfigStore;
pub use display::TerminalSurface;
pub use keystroke::{create_keystroke, EnigoKeystroke, NoOpKeystroke};
pub use notification::{create_notifier, NotifyRustNotifier, SilentNotifier};
pub use output::SystemOutputSink;
pub use recognizer::ProcessRecognizer;
