//! Desktop notification adapters

mod notify_rust;

pub use notify_rust::NotifyRustNotifier;

use async_trait::async_trait;

use crate::application::ports::{Notice, NotificationError, Notifier};

/// Notifier that drops every notification, used when notifications are off
pub struct SilentNotifier;

#[async_trait]
impl Notifier for SilentNotifier {
    async fn notify(&self, _notice: &Notice) -> Result<(), NotificationError> {
        Ok(())
    }
}

/// Notifier for this session
pub fn create_notifier(enabled: bool) -> Box<dyn Notifier> {
    if enabled {
        Box::new(NotifyRustNotifier::new())
    } else {
        Box::new(SilentNotifier)
    }
}
