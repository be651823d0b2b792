//! No-op keystroke adapter

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{Keystroke, KeystrokeError};

/// Keystroke adapter that discards everything.
///
/// Used when keyboard simulation is unavailable; text still reaches the
/// clipboard and the user pastes it by hand.
pub struct NoOpKeystroke;

impl NoOpKeystroke {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpKeystroke {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Keystroke for NoOpKeystroke {
    async fn type_text(&self, text: &str) -> Result<(), KeystrokeError> {
        debug!(chars = text.chars().count(), "Keyboard simulation disabled, not typing");
        Ok(())
    }

    async fn paste(&self) -> Result<(), KeystrokeError> {
        debug!("Keyboard simulation disabled, not pasting");
        Ok(())
    }
}
