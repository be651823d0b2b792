//! Keystroke port interface

use async_trait::async_trait;
use thiserror::Error;

/// Keystroke errors
#[derive(Debug, Clone, Error)]
pub enum KeystrokeError {
    #[error("Keyboard simulation unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to type text: {0}")]
    TypeFailed(String),

    #[error("Failed to send paste shortcut: {0}")]
    PasteFailed(String),
}

/// Port for keystroke injection
#[async_trait]
pub trait Keystroke: Send + Sync {
    /// Type text into the currently focused window.
    ///
    /// # Arguments
    /// * `text` - The text to type
    ///
    /// # Returns
    /// Ok(()) on success, error otherwise
    async fn type_text(&self, text: &str) -> Result<(), KeystrokeError>;

    /// Send the platform paste shortcut (Ctrl+V, or Cmd+V on macOS).
    async fn paste(&self) -> Result<(), KeystrokeError>;
}

/// Blanket implementation for boxed keystroke types
#[async_trait]
impl Keystroke for Box<dyn Keystroke> {
    async fn type_text(&self, text: &str) -> Result<(), KeystrokeError> {
        self.as_ref().type_text(text).await
    }

    async fn paste(&self) -> Result<(), KeystrokeError> {
        self.as_ref().paste().await
    }
}
