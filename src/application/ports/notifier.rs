//! Notification port interface

use async_trait::async_trait;
use thiserror::Error;

/// Notification errors
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Failed to show notification: {0}")]
    SendFailed(String),
}

/// Something the user should hear about while the terminal is out of sight
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A session could not be started
    StartFailed(String),
    /// The recognizer reported an error for the active session
    RecognitionFailed(String),
}

impl Notice {
    pub const fn summary(&self) -> &'static str {
        match self {
            Self::StartFailed(_) => "Recording could not start",
            Self::RecognitionFailed(_) => "Recognition failed",
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Self::StartFailed(detail) | Self::RecognitionFailed(detail) => detail,
        }
    }

    /// Freedesktop icon name
    pub const fn icon_name(&self) -> &'static str {
        match self {
            Self::StartFailed(_) => "dialog-error",
            Self::RecognitionFailed(_) => "dialog-warning",
        }
    }
}

/// Port for desktop notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: &Notice) -> Result<(), NotificationError>;
}

#[async_trait]
impl Notifier for Box<dyn Notifier> {
    async fn notify(&self, notice: &Notice) -> Result<(), NotificationError> {
        self.as_ref().notify(notice).await
    }
}
