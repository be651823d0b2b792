//! Keystroke adapter backed by enigo
//!
//! Works on Windows, macOS, and Linux (X11, and Wayland through libei).

use async_trait::async_trait;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};

use crate::application::ports::{Keystroke, KeystrokeError};

#[cfg(target_os = "macos")]
const PASTE_MODIFIER: Key = Key::Meta;
#[cfg(not(target_os = "macos"))]
const PASTE_MODIFIER: Key = Key::Control;

/// Keystroke adapter backed by enigo
pub struct EnigoKeystroke;

impl EnigoKeystroke {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnigoKeystroke {
    fn default() -> Self {
        Self::new()
    }
}

fn open() -> Result<Enigo, KeystrokeError> {
    Enigo::new(&Settings::default())
        .map_err(|e| KeystrokeError::Unavailable(format!("Failed to create enigo: {}", e)))
}

fn press_paste(enigo: &mut Enigo) -> Result<(), enigo::InputError> {
    enigo.key(PASTE_MODIFIER, Direction::Press)?;
    let pressed = enigo.key(Key::Unicode('v'), Direction::Click);
    // Always release the modifier, even when the click failed
    enigo.key(PASTE_MODIFIER, Direction::Release)?;
    pressed
}

#[async_trait]
impl Keystroke for EnigoKeystroke {
    async fn type_text(&self, text: &str) -> Result<(), KeystrokeError> {
        let text = text.to_owned();

        tokio::task::spawn_blocking(move || {
            open()?
                .text(&text)
                .map_err(|e| KeystrokeError::TypeFailed(e.to_string()))
        })
        .await
        .map_err(|e| KeystrokeError::TypeFailed(format!("Task join error: {}", e)))?
    }

    async fn paste(&self) -> Result<(), KeystrokeError> {
        tokio::task::spawn_blocking(|| {
            let mut enigo = open()?;
            press_paste(&mut enigo).map_err(|e| KeystrokeError::PasteFailed(e.to_string()))
        })
        .await
        .map_err(|e| KeystrokeError::PasteFailed(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keystroke_default_creates() {
        let _keystroke = EnigoKeystroke::default();
    }

    #[test]
    fn paste_modifier_matches_platform() {
        if cfg!(target_os = "macos") {
            assert_eq!(PASTE_MODIFIER, Key::Meta);
        } else {
            assert_eq!(PASTE_MODIFIER, Key::Control);
        }
    }
}
