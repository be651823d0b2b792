//! Desktop notification adapter using notify-rust

use async_trait::async_trait;
use notify_rust::{Notification, Timeout};
use tracing::debug;

use crate::application::ports::{Notice, NotificationError, Notifier};

const APP_NAME: &str = "Sayble";

/// How long a notice stays on screen
const NOTICE_TIMEOUT_MS: u32 = 5000;

pub struct NotifyRustNotifier;

impl NotifyRustNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NotifyRustNotifier {
    fn default() -> Self {
        Self::new()
    }
}

fn build(notice: &Notice) -> Notification {
    let mut notification = Notification::new();
    notification
        .appname(APP_NAME)
        .summary(notice.summary())
        .body(notice.body())
        .icon(notice.icon_name())
        .timeout(Timeout::Milliseconds(NOTICE_TIMEOUT_MS));
    notification
}

#[async_trait]
impl Notifier for NotifyRustNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), NotificationError> {
        debug!(summary = notice.summary(), "Sending desktop notification");
        let notification = build(notice);

        tokio::task::spawn_blocking(move || {
            notification
                .show()
                .map(|_| ())
                .map_err(|e| NotificationError::SendFailed(e.to_string()))
        })
        .await
        .map_err(|e| NotificationError::SendFailed(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_carries_notice_text() {
        let notification = build(&Notice::StartFailed("recognizer missing".to_string()));
        assert_eq!(notification.appname, APP_NAME);
        assert_eq!(notification.summary, "Recording could not start");
        assert_eq!(notification.body, "recognizer missing");
        assert_eq!(notification.icon, "dialog-error");
    }
}
