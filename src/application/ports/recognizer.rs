//! Recognizer port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::config::Credentials;
use crate::domain::session::Generation;

/// Recognizer errors
#[derive(Debug, Clone, Error)]
pub enum RecognizerError {
    #[error("Recognizer not found: {0}")]
    NotFound(String),

    #[error("Failed to start recognizer: {0}")]
    StartFailed(String),

    #[error("Failed to stop recognizer: {0}")]
    StopFailed(String),
}

/// Port for the external speech recognizer.
///
/// Events are not returned from these calls; the adapter publishes them on the
/// event bus tagged with the generation passed to `start_recording`.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Begin capturing audio and streaming it for recognition.
    ///
    /// # Arguments
    /// * `credentials` - Recognizer account and language options
    /// * `device` - Input device name, or None for the system default
    /// * `generation` - Session the recognizer must tag its events with
    async fn start_recording(
        &self,
        credentials: &Credentials,
        device: Option<&str>,
        generation: Generation,
    ) -> Result<(), RecognizerError>;

    /// Stop capturing; the recognizer flushes its final result afterwards.
    ///
    /// Calling this with no active session succeeds.
    async fn stop_recording(&self) -> Result<(), RecognizerError>;
}

#[async_trait]
impl<T: Recognizer + ?Sized> Recognizer for std::sync::Arc<T> {
    async fn start_recording(
        &self,
        credentials: &Credentials,
        device: Option<&str>,
        generation: Generation,
    ) -> Result<(), RecognizerError> {
        self.as_ref()
            .start_recording(credentials, device, generation)
            .await
    }

    async fn stop_recording(&self) -> Result<(), RecognizerError> {
        self.as_ref().stop_recording().await
    }
}
