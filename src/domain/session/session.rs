//! Recording session entity

use thiserror::Error;

use super::phase::SessionPhase;
use super::registry::Generation;

/// Error when an invalid phase transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_phase} state")]
pub struct InvalidPhaseTransition {
    pub current_phase: SessionPhase,
    pub action: String,
}

/// One recording-to-transcript cycle.
///
/// State machine:
///   IDLE -> RECORDING (begin)
///   RECORDING -> RECOGNIZING (stop_recording)
///   RECORDING | RECOGNIZING -> IDLE (cancel)
///   RECORDING | RECOGNIZING -> DONE (finalize, finalize_from_partial)
///   RECORDING | RECOGNIZING -> ERROR (fail)
///   any -> IDLE (finish)
///
/// The final text is written at most once, and a cancelled session ignores
/// everything after the cancel.
#[derive(Debug, Clone, Default)]
pub struct Session {
    generation: Generation,
    phase: SessionPhase,
    partial_text: String,
    final_text: Option<String>,
    error: Option<String>,
    output_committed: bool,
    cancelled: bool,
}

impl Session {
    /// Session placeholder before the first recording
    pub fn idle() -> Self {
        Self::default()
    }

    /// Fresh session in the recording phase
    pub fn begin(generation: Generation) -> Self {
        Self {
            generation,
            phase: SessionPhase::Recording,
            ..Self::default()
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn partial_text(&self) -> &str {
        &self.partial_text
    }

    pub fn final_text(&self) -> Option<&str> {
        self.final_text.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_output_committed(&self) -> bool {
        self.output_committed
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Transition from RECORDING to RECOGNIZING
    pub fn stop_recording(&mut self) -> Result<(), InvalidPhaseTransition> {
        if self.phase != SessionPhase::Recording {
            return Err(self.invalid("stop recording"));
        }
        self.phase = SessionPhase::Recognizing;
        Ok(())
    }

    /// Transition from RECORDING or RECOGNIZING to IDLE, discarding any result
    pub fn cancel(&mut self) -> Result<(), InvalidPhaseTransition> {
        if !self.phase.is_active() {
            return Err(self.invalid("cancel recording"));
        }
        self.cancelled = true;
        self.phase = SessionPhase::Idle;
        Ok(())
    }

    /// Replace the partial transcript. Returns false when the session no longer
    /// takes text.
    pub fn update_partial(&mut self, text: &str) -> bool {
        if self.cancelled || !self.phase.is_active() {
            return false;
        }
        self.partial_text.clear();
        self.partial_text.push_str(text);
        true
    }

    /// Set the final transcript and move to DONE.
    ///
    /// Returns the text to hand to output, or None when the session is cancelled
    /// or already has its final text.
    pub fn finalize(&mut self, text: &str) -> Option<String> {
        if self.cancelled || self.final_text.is_some() || !self.phase.is_active() {
            return None;
        }
        self.final_text = Some(text.to_string());
        self.phase = SessionPhase::Done;
        Some(text.to_string())
    }

    /// The recognizer closed without a final result: promote the last partial.
    pub fn finalize_from_partial(&mut self) -> Option<String> {
        let partial = std::mem::take(&mut self.partial_text);
        let result = self.finalize(&partial);
        if result.is_none() {
            self.partial_text = partial;
        }
        result
    }

    /// Transition to ERROR with the backend's detail
    pub fn fail(&mut self, detail: &str) -> bool {
        if self.cancelled || !self.phase.is_active() {
            return false;
        }
        self.error = Some(detail.to_string());
        self.phase = SessionPhase::Error;
        true
    }

    /// The recognizer is done with this session
    pub fn finish(&mut self) {
        self.phase = SessionPhase::Idle;
    }

    /// Record that the text went to output. Returns false when it already had.
    pub fn mark_output_committed(&mut self) -> bool {
        if self.output_committed {
            return false;
        }
        self.output_committed = true;
        true
    }

    fn invalid(&self, action: &str) -> InvalidPhaseTransition {
        InvalidPhaseTransition {
            current_phase: self.phase,
            action: action.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording() -> Session {
        Session::begin(Generation::new(1))
    }

    #[test]
    fn idle_session_has_no_text() {
        let session = Session::idle();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.partial_text(), "");
        assert!(session.final_text().is_none());
        assert!(!session.is_output_committed());
        assert!(!session.is_cancelled());
    }

    #[test]
    fn stop_recording_from_recording() {
        let mut session = recording();
        assert!(session.stop_recording().is_ok());
        assert_eq!(session.phase(), SessionPhase::Recognizing);
    }

    #[test]
    fn stop_recording_from_recognizing_fails() {
        let mut session = recording();
        session.stop_recording().unwrap();
        let err = session.stop_recording().unwrap_err();
        assert_eq!(err.current_phase, SessionPhase::Recognizing);
        assert!(err.to_string().contains("stop recording"));
    }

    #[test]
    fn cancel_from_idle_fails() {
        let mut session = Session::idle();
        let err = session.cancel().unwrap_err();
        assert_eq!(err.current_phase, SessionPhase::Idle);
    }

    #[test]
    fn partial_text_is_replaced_wholesale() {
        let mut session = recording();
        assert!(session.update_partial("hel"));
        assert!(session.update_partial("hello"));
        assert_eq!(session.partial_text(), "hello");
    }

    #[test]
    fn final_text_is_set_once() {
        let mut session = recording();
        assert_eq!(session.finalize("first"), Some("first".to_string()));
        assert_eq!(session.finalize("second"), None);
        assert_eq!(session.final_text(), Some("first"));
        assert_eq!(session.phase(), SessionPhase::Done);
    }

    #[test]
    fn cancelled_session_ignores_results() {
        let mut session = recording();
        session.update_partial("hello");
        session.cancel().unwrap();
        assert!(!session.update_partial("more"));
        assert_eq!(session.finalize("hello world"), None);
        assert_eq!(session.finalize_from_partial(), None);
        assert!(!session.fail("boom"));
        assert!(session.final_text().is_none());
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn fallback_promotes_last_partial() {
        let mut session = recording();
        session.update_partial("hello");
        session.stop_recording().unwrap();
        assert_eq!(session.finalize_from_partial(), Some("hello".to_string()));
        assert_eq!(session.final_text(), Some("hello"));
    }

    #[test]
    fn fallback_after_final_keeps_final() {
        let mut session = recording();
        session.update_partial("hel");
        session.finalize("hello");
        assert_eq!(session.finalize_from_partial(), None);
        assert_eq!(session.final_text(), Some("hello"));
    }

    #[test]
    fn fail_records_detail() {
        let mut session = recording();
        assert!(session.fail("socket closed"));
        assert_eq!(session.phase(), SessionPhase::Error);
        assert_eq!(session.error(), Some("socket closed"));
    }

    #[test]
    fn output_commitment_is_one_shot() {
        let mut session = recording();
        assert!(session.mark_output_committed());
        assert!(!session.mark_output_committed());
        assert!(session.is_output_committed());
    }

    #[test]
    fn finish_returns_to_idle() {
        let mut session = recording();
        session.finalize("done");
        session.finish();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.final_text(), Some("done"));
    }
}
