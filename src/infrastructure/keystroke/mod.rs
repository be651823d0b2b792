//! Keystroke adapters

mod enigo;
mod noop;

pub use enigo::EnigoKeystroke;
pub use noop::NoOpKeystroke;

use crate::application::ports::Keystroke;

/// Keystroke adapter for this session: enigo, or a no-op when simulation is
/// switched off
pub fn create_keystroke(enabled: bool) -> Box<dyn Keystroke> {
    if enabled {
        Box::new(EnigoKeystroke::new())
    } else {
        Box::new(NoOpKeystroke::new())
    }
}
