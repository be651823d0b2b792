//! Recording controller use case
//!
//! Owns the session phase, interprets trigger intents against it, drives the
//! recognizer, and hands terminal text to the output dispatcher. Events from
//! the recognizer pass through the session registry first, so events of
//! superseded or cancelled sessions never touch the current one.

use std::time::Instant;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::bus::{ControlBus, Subscription};
use super::dispatcher::{CommitOutcome, OutputDispatcher};
use super::ports::{Notice, Notifier, OutputError, OutputSink, Recognizer, RecognizerError};
use crate::domain::action::{ControlMessage, HotkeyAction};
use crate::domain::config::Credentials;
use crate::domain::error::MissingCredentials;
use crate::domain::event::{EventEnvelope, RecognizerEvent};
use crate::domain::output::OutputPolicy;
use crate::domain::recording::Duration;
use crate::domain::session::{
    Admission, Generation, InvalidPhaseTransition, Session, SessionPhase, SessionRegistry,
};

/// Errors from the recording controller
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    MissingCredentials(#[from] MissingCredentials),

    #[error("Recognizer failed: {0}")]
    Recognizer(#[from] RecognizerError),

    #[error("{0}")]
    InvalidState(#[from] InvalidPhaseTransition),

    #[error("Output failed: {0}")]
    Output(#[from] OutputError),
}

/// Configuration for the controller
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Recognizer credentials; None rejects every start
    pub credentials: Option<Credentials>,
    /// Input device name; None selects the system default
    pub device: Option<String>,
    /// The external stop is held back until a recording is at least this long
    pub min_recording: Duration,
    /// Safety limit after which a recording is stopped automatically
    pub max_duration: Duration,
    pub output: OutputPolicy,
    /// Whether to show desktop notifications on start failures
    pub enable_notify: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            device: None,
            min_recording: Duration::default_min_recording(),
            max_duration: Duration::default_max_duration(),
            output: OutputPolicy::default(),
            enable_notify: false,
        }
    }
}

/// Result of feeding one event to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Filtered out or had no effect
    Ignored,
    /// Changed session state
    Applied,
    /// The recognizer is done with the session
    SessionEnded,
}

struct ControllerState {
    registry: SessionRegistry,
    session: Session,
    started_at: Option<Instant>,
}

/// Recording controller use case
pub struct RecordingController<R, S, N>
where
    R: Recognizer,
    S: OutputSink,
    N: Notifier,
{
    recognizer: R,
    dispatcher: OutputDispatcher<S>,
    notifier: N,
    control: ControlBus,
    state: Mutex<ControllerState>,
    config: ControllerConfig,
}

impl<R, S, N> RecordingController<R, S, N>
where
    R: Recognizer,
    S: OutputSink,
    N: Notifier,
{
    /// Create a new controller. Display instructions are published on `control`.
    pub fn new(
        recognizer: R,
        sink: S,
        notifier: N,
        control: ControlBus,
        config: ControllerConfig,
    ) -> Self {
        Self {
            recognizer,
            dispatcher: OutputDispatcher::new(sink, config.output),
            notifier,
            control,
            state: Mutex::new(ControllerState {
                registry: SessionRegistry::new(),
                session: Session::idle(),
                started_at: None,
            }),
            config,
        }
    }

    pub async fn phase(&self) -> SessionPhase {
        self.state.lock().await.session.phase()
    }

    /// Snapshot of the current session
    pub async fn session(&self) -> Session {
        self.state.lock().await.session.clone()
    }

    /// Time since the current recording began, while one is being captured
    pub async fn elapsed(&self) -> Option<std::time::Duration> {
        let state = self.state.lock().await;
        match state.session.phase() {
            SessionPhase::Recording => state.started_at.map(|started| started.elapsed()),
            _ => None,
        }
    }

    /// Whether the current recording ran past the safety limit
    pub async fn exceeds_max_duration(&self) -> bool {
        self.elapsed()
            .await
            .is_some_and(|elapsed| elapsed >= self.config.max_duration.as_std())
    }

    /// Interpret a trigger intent against the current phase.
    ///
    /// Races between triggers surface as invalid transitions and are dropped
    /// here; only real failures are returned.
    pub async fn handle_action(&self, action: HotkeyAction) -> Result<(), ControllerError> {
        let phase = self.phase().await;
        let result = match (action, phase) {
            (HotkeyAction::StartRecording, phase) if phase.is_settled() => {
                self.start(self.config.credentials.as_ref()).await.map(|_| ())
            }
            (HotkeyAction::StopRecording, SessionPhase::Recording)
            | (HotkeyAction::ToggleRecording, SessionPhase::Recording) => self.stop().await,
            (HotkeyAction::CancelRecording, phase) if phase.is_active() => self.cancel().await,
            (HotkeyAction::ToggleRecording, phase) if phase.is_settled() => {
                self.start(self.config.credentials.as_ref()).await.map(|_| ())
            }
            (action, phase) => {
                debug!(%action, %phase, "Action has no effect in this phase");
                Ok(())
            }
        };

        match result {
            Err(ControllerError::InvalidState(e)) => {
                debug!(%action, error = %e, "Action lost a race with another trigger");
                Ok(())
            }
            other => other,
        }
    }

    /// Start a new recording session.
    ///
    /// Missing credentials are rejected before any session exists. A failing
    /// recognizer start returns the controller to idle.
    pub async fn start(
        &self,
        credentials: Option<&Credentials>,
    ) -> Result<Generation, ControllerError> {
        let credentials = match credentials {
            Some(credentials) => credentials,
            None => {
                let err = MissingCredentials;
                self.report(Notice::StartFailed(err.to_string())).await;
                return Err(err.into());
            }
        };

        let generation = {
            let mut state = self.state.lock().await;
            if state.session.phase().is_active() {
                return Err(InvalidPhaseTransition {
                    current_phase: state.session.phase(),
                    action: "start recording".to_string(),
                }
                .into());
            }
            let generation = state.registry.begin_local();
            state.session = Session::begin(generation);
            state.started_at = Some(Instant::now());
            generation
        };

        let policy = self.dispatcher.policy();
        self.control.publish(ControlMessage::start(
            generation,
            policy.mode,
            policy.auto_output,
        ));

        if let Err(e) = self
            .recognizer
            .start_recording(credentials, self.config.device.as_deref(), generation)
            .await
        {
            {
                let mut state = self.state.lock().await;
                if state.session.generation() == generation && state.session.phase().is_active() {
                    state.registry.cancel();
                    state.session = Session::idle();
                    state.started_at = None;
                }
            }
            self.control.publish(ControlMessage::cancel(generation));
            error!(%generation, error = %e, "Failed to start recording");
            self.report(Notice::StartFailed(e.to_string())).await;
            return Err(e.into());
        }

        let (live, stop_requested) = {
            let state = self.state.lock().await;
            (
                state.registry.is_live(generation),
                state.session.phase() != SessionPhase::Recording,
            )
        };
        if !live || stop_requested {
            // A cancel or stop ran before the recognizer existed and had nothing to reach.
            debug!(%generation, live, "Session changed while the recognizer was starting");
            if let Err(e) = self.recognizer.stop_recording().await {
                debug!(%generation, error = %e, "Ignoring recognizer stop failure after late start");
            }
            if !live {
                return Ok(generation);
            }
        }

        info!(%generation, "Recording started");
        Ok(generation)
    }

    /// Stop capturing and wait for the recognizer's result.
    ///
    /// The phase moves to recognizing at once; the external stop is delayed
    /// until the recording has lasted `min_recording`.
    pub async fn stop(&self) -> Result<(), ControllerError> {
        let (generation, started_at) = {
            let mut state = self.state.lock().await;
            state.session.stop_recording()?;
            (state.session.generation(), state.started_at)
        };
        self.control.publish(ControlMessage::stop(generation));

        let floor = self.config.min_recording.as_std();
        if let Some(started_at) = started_at {
            let elapsed = started_at.elapsed();
            if elapsed < floor {
                debug!(
                    %generation,
                    wait_ms = (floor - elapsed).as_millis() as u64,
                    "Holding stop until minimum recording length"
                );
                tokio::time::sleep(floor - elapsed).await;
            }
        }

        if !self.state.lock().await.registry.is_live(generation) {
            debug!(%generation, "Session moved on before the stop was sent");
            return Ok(());
        }

        match self.recognizer.stop_recording().await {
            Ok(()) => info!(%generation, "Recording stopped, waiting for result"),
            Err(e) => warn!(%generation, error = %e, "Recognizer stop failed"),
        }
        Ok(())
    }

    /// Abandon the current session; nothing it produces will be output.
    pub async fn cancel(&self) -> Result<(), ControllerError> {
        let generation = {
            let mut state = self.state.lock().await;
            state.session.cancel()?;
            state.started_at = None;
            state.registry.cancel()
        };
        self.dispatcher.mark_cancelled(generation).await;
        self.control.publish(ControlMessage::cancel(generation));

        if let Err(e) = self.recognizer.stop_recording().await {
            debug!(%generation, error = %e, "Ignoring recognizer stop failure after cancel");
        }
        info!(%generation, "Recording cancelled");
        Ok(())
    }

    /// Text most recently written or held for copy
    pub async fn last_text(&self) -> Option<String> {
        self.dispatcher.last_text().await
    }

    /// Copy the last recognized text to the clipboard
    pub async fn copy_last(&self) -> Result<String, ControllerError> {
        Ok(self.dispatcher.copy_available().await?)
    }

    /// Feed one recognizer event through the registry and into the session
    pub async fn handle_event(&self, envelope: &EventEnvelope) -> EventOutcome {
        let generation = envelope.generation;
        let (outcome, to_commit, failure) = {
            let mut state = self.state.lock().await;
            match state.registry.accept(generation) {
                Admission::Stale | Admission::Cancelled => {
                    debug!(%generation, event = envelope.event.kind(), "Dropping event of inactive session");
                    return EventOutcome::Ignored;
                }
                Admission::Opened => {
                    debug!(%generation, "Recognizer opened a new session");
                    state.session = Session::begin(generation);
                    state.started_at = Some(Instant::now());
                }
                Admission::Current => {}
            }

            let mut to_commit = None;
            let mut failure = None;
            let outcome = match &envelope.event {
                RecognizerEvent::Connected => {
                    debug!(%generation, "Recognizer connected");
                    EventOutcome::Applied
                }
                RecognizerEvent::PartialResult(text) => applied(state.session.update_partial(text)),
                RecognizerEvent::FinalResult(text) => {
                    to_commit = state.session.finalize(text);
                    applied(to_commit.is_some())
                }
                RecognizerEvent::Disconnected => {
                    to_commit = state.session.finalize_from_partial();
                    if to_commit.is_some() {
                        info!(%generation, "Recognizer closed without a final result, using last partial");
                    }
                    applied(to_commit.is_some())
                }
                RecognizerEvent::Error(detail) => {
                    if state.session.fail(detail) {
                        error!(%generation, detail = %detail, "Recognition failed");
                        state.started_at = None;
                        failure = Some(detail.clone());
                    }
                    EventOutcome::Applied
                }
                RecognizerEvent::Finished => {
                    state.session.finish();
                    state.started_at = None;
                    EventOutcome::Applied
                }
                RecognizerEvent::Polishing(_)
                | RecognizerEvent::PolishResult(_)
                | RecognizerEvent::PolishError
                | RecognizerEvent::Ignored => EventOutcome::Ignored,
            };

            let outcome = if envelope.event.ends_session() {
                EventOutcome::SessionEnded
            } else {
                outcome
            };
            let to_commit = to_commit.filter(|_| state.session.mark_output_committed());
            (outcome, to_commit, failure)
        };

        if let Some(detail) = failure {
            self.report(Notice::RecognitionFailed(detail)).await;
        }

        if let Some(text) = to_commit {
            if self.dispatcher.commit(generation, &text).await == CommitOutcome::Failed {
                warn!(%generation, "Recognized text could not be delivered");
            }
        }
        outcome
    }

    /// Consume recognizer events until the subscription ends.
    ///
    /// The subscription is renewed whenever a session ends; only queued events
    /// of newer sessions survive the renew.
    pub async fn run(&self, mut events: Subscription<EventEnvelope>) {
        while let Some(envelope) = events.recv().await {
            if self.handle_event(&envelope).await == EventOutcome::SessionEnded {
                let ended = self.state.lock().await.registry.current();
                events.renew_keeping(|queued| queued.generation > ended);
            }
        }
    }

    async fn report(&self, notice: Notice) {
        if !self.config.enable_notify {
            return;
        }
        if let Err(e) = self.notifier.notify(&notice).await {
            debug!(error = %e, "Notification not shown");
        }
    }
}

fn applied(changed: bool) -> EventOutcome {
    if changed {
        EventOutcome::Applied
    } else {
        EventOutcome::Ignored
    }
}
