//! Output sink that writes into the focused application
//!
//! Clipboard mode pastes through the clipboard and then puts back whatever
//! the user had copied before. Keyboard mode types the text directly.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::ports::{Clipboard, Keystroke, OutputError, OutputSink};
use crate::domain::output::OutputMode;

/// Pause between setting the clipboard and sending the paste shortcut
const PASTE_SETTLE: Duration = Duration::from_millis(50);
/// Pause before restoring the previous clipboard content
const RESTORE_DELAY: Duration = Duration::from_millis(100);

/// Output sink built from a clipboard and a keystroke adapter
pub struct SystemOutputSink<C: Clipboard, K: Keystroke> {
    clipboard: C,
    keystroke: K,
    paste_settle: Duration,
    restore_delay: Duration,
}

impl<C: Clipboard, K: Keystroke> SystemOutputSink<C, K> {
    pub fn new(clipboard: C, keystroke: K) -> Self {
        Self {
            clipboard,
            keystroke,
            paste_settle: PASTE_SETTLE,
            restore_delay: RESTORE_DELAY,
        }
    }

    /// Override the paste timing
    pub fn with_delays(mut self, paste_settle: Duration, restore_delay: Duration) -> Self {
        self.paste_settle = paste_settle;
        self.restore_delay = restore_delay;
        self
    }

    async fn paste_via_clipboard(&self, text: &str) -> Result<(), OutputError> {
        let backup = match self.clipboard.read().await {
            Ok(backup) => backup,
            Err(e) => {
                debug!(error = %e, "Could not back up clipboard");
                None
            }
        };

        self.clipboard.copy(text).await?;
        tokio::time::sleep(self.paste_settle).await;
        let pasted = self.keystroke.paste().await;

        if let Some(previous) = backup {
            tokio::time::sleep(self.restore_delay).await;
            if let Err(e) = self.clipboard.copy(&previous).await {
                warn!(error = %e, "Failed to restore clipboard");
            }
        }

        pasted.map_err(OutputError::from)
    }
}

#[async_trait]
impl<C: Clipboard, K: Keystroke> OutputSink for SystemOutputSink<C, K> {
    async fn commit_text(&self, text: &str, mode: OutputMode) -> Result<(), OutputError> {
        match mode {
            OutputMode::Clipboard => self.paste_via_clipboard(text).await,
            OutputMode::SimulateKeyboard => Ok(self.keystroke.type_text(text).await?),
        }
    }

    async fn copy_text(&self, text: &str) -> Result<(), OutputError> {
        Ok(self.clipboard.copy(text).await?)
    }
}
