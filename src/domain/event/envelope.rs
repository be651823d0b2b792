//! Generation-tagged recognizer event

use serde_json::Value;

use super::normalizer::{normalize, RecognizerEvent};
use crate::domain::session::Generation;

/// A normalized event together with the session it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEnvelope {
    pub generation: Generation,
    pub event: RecognizerEvent,
}

impl EventEnvelope {
    pub fn new(generation: Generation, event: RecognizerEvent) -> Self {
        Self { generation, event }
    }

    /// Parse `{"sessionId": n, "event": payload}`.
    ///
    /// Returns None when the session id is missing or not a non-negative
    /// integer; such an envelope cannot be attributed to any session.
    pub fn from_value(raw: &Value) -> Option<Self> {
        let generation = raw.get("sessionId")?.as_u64()?;
        let payload = raw.get("event")?;
        Some(Self::new(Generation::new(generation), normalize(payload)))
    }

    /// Parse one line of recognizer output.
    ///
    /// An envelope is taken as-is. A bare payload belongs to `fallback`, the
    /// generation the recognizer was started with.
    pub fn from_line(line: &str, fallback: Generation) -> Option<Self> {
        let value: Value = serde_json::from_str(line.trim()).ok()?;
        if value.get("sessionId").is_some() {
            return Self::from_value(&value);
        }
        Some(Self::new(fallback, normalize(&value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_envelope() {
        let envelope =
            EventEnvelope::from_value(&json!({"sessionId": 4, "event": {"PartialResult": "hi"}}))
                .unwrap();
        assert_eq!(envelope.generation, Generation::new(4));
        assert_eq!(envelope.event, RecognizerEvent::PartialResult("hi".to_string()));
    }

    #[test]
    fn envelope_with_unknown_event_is_kept_as_ignored() {
        let envelope =
            EventEnvelope::from_value(&json!({"sessionId": 1, "event": {"Whatever": 1}})).unwrap();
        assert_eq!(envelope.event, RecognizerEvent::Ignored);
    }

    #[test]
    fn bad_session_id_is_rejected() {
        assert!(EventEnvelope::from_value(&json!({"sessionId": "1", "event": "Finished"})).is_none());
        assert!(EventEnvelope::from_value(&json!({"sessionId": -1, "event": "Finished"})).is_none());
        assert!(EventEnvelope::from_value(&json!({"event": "Finished"})).is_none());
        assert!(EventEnvelope::from_value(&json!({"sessionId": 2})).is_none());
    }

    #[test]
    fn bare_line_uses_fallback_generation() {
        let envelope = EventEnvelope::from_line("\"Connected\"", Generation::new(9)).unwrap();
        assert_eq!(envelope.generation, Generation::new(9));
        assert_eq!(envelope.event, RecognizerEvent::Connected);
    }

    #[test]
    fn tagged_line_overrides_fallback() {
        let line = r#"{"sessionId": 3, "event": {"FinalResult": ["done", 1200]}}"#;
        let envelope = EventEnvelope::from_line(line, Generation::new(9)).unwrap();
        assert_eq!(envelope.generation, Generation::new(3));
        assert_eq!(envelope.event, RecognizerEvent::FinalResult("done".to_string()));
    }

    #[test]
    fn garbage_line_is_dropped() {
        assert!(EventEnvelope::from_line("not json", Generation::new(1)).is_none());
        assert!(EventEnvelope::from_line("", Generation::new(1)).is_none());
    }
}
