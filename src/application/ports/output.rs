//! Output sink port interface

use async_trait::async_trait;
use thiserror::Error;

use super::clipboard::ClipboardError;
use super::keystroke::KeystrokeError;
use crate::domain::output::OutputMode;

/// Output errors
#[derive(Debug, Clone, Error)]
pub enum OutputError {
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    #[error(transparent)]
    Keystroke(#[from] KeystrokeError),

    #[error("No recognized text to copy yet")]
    NothingToCopy,
}

/// Port for delivering recognized text to the focused application
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Insert text into the focused application using `mode`.
    async fn commit_text(&self, text: &str, mode: OutputMode) -> Result<(), OutputError>;

    /// Put text on the clipboard without pasting it.
    async fn copy_text(&self, text: &str) -> Result<(), OutputError>;
}
