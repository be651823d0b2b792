//! Recognizer event normalization
//!
//! The recognizer speaks a loose protocol: a terminal status may arrive as a
//! bare string (`"Finished"`) or as a single-key object (`{"Connected": null}`),
//! and text-bearing events wrap their payload (`{"PartialResult": "hel"}`).
//! Everything is folded into [`RecognizerEvent`]. Shapes we do not know become
//! [`RecognizerEvent::Ignored`] so a newer recognizer never breaks the client.

use serde_json::Value;

/// Canonical recognizer event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerEvent {
    /// The recognizer accepted the session and is listening
    Connected,
    /// In-progress transcript; replaces the previous partial
    PartialResult(String),
    /// Terminal transcript for the session
    FinalResult(String),
    /// The recognizer closed its stream
    Disconnected,
    /// Transport or backend failure
    Error(String),
    /// Last event of a session
    Finished,
    /// Downstream polishing started on this text
    Polishing(String),
    /// Downstream polishing produced this text
    PolishResult(String),
    /// Downstream polishing failed; the unpolished text stands
    PolishError,
    /// Unknown or malformed payload
    Ignored,
}

impl RecognizerEvent {
    /// Short name for logs
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Connected => "Connected",
            Self::PartialResult(_) => "PartialResult",
            Self::FinalResult(_) => "FinalResult",
            Self::Disconnected => "Disconnected",
            Self::Error(_) => "Error",
            Self::Finished => "Finished",
            Self::Polishing(_) => "Polishing",
            Self::PolishResult(_) => "PolishResult",
            Self::PolishError => "PolishError",
            Self::Ignored => "Ignored",
        }
    }

    /// Whether this event decides the session's outcome: a result, a lost
    /// connection, or a failure
    pub const fn settles_session(&self) -> bool {
        matches!(self, Self::FinalResult(_) | Self::Disconnected | Self::Error(_))
    }

    /// Whether listeners are done with the session after this event
    pub const fn ends_session(&self) -> bool {
        matches!(self, Self::Finished | Self::Error(_))
    }
}

/// Normalize a raw recognizer payload. Never fails.
pub fn normalize(raw: &Value) -> RecognizerEvent {
    match raw {
        Value::String(tag) => normalize_tag(tag, &Value::Null),
        Value::Object(map) if map.len() == 1 => match map.iter().next() {
            Some((tag, payload)) => normalize_tag(tag, payload),
            None => RecognizerEvent::Ignored,
        },
        _ => RecognizerEvent::Ignored,
    }
}

/// Normalize a JSON text payload; invalid JSON is ignored like any unknown shape
pub fn normalize_str(raw: &str) -> RecognizerEvent {
    serde_json::from_str::<Value>(raw)
        .map(|value| normalize(&value))
        .unwrap_or(RecognizerEvent::Ignored)
}

fn normalize_tag(tag: &str, payload: &Value) -> RecognizerEvent {
    match tag {
        "Connected" => RecognizerEvent::Connected,
        "Disconnected" => RecognizerEvent::Disconnected,
        "Finished" => RecognizerEvent::Finished,
        "PolishError" => RecognizerEvent::PolishError,
        "Error" => RecognizerEvent::Error(error_detail(payload)),
        "PartialResult" => text_of(payload)
            .map(RecognizerEvent::PartialResult)
            .unwrap_or(RecognizerEvent::Ignored),
        "FinalResult" => final_text_of(payload)
            .map(RecognizerEvent::FinalResult)
            .unwrap_or(RecognizerEvent::Ignored),
        "Polishing" => text_of(payload)
            .map(RecognizerEvent::Polishing)
            .unwrap_or(RecognizerEvent::Ignored),
        "PolishResult" => text_of(payload)
            .map(RecognizerEvent::PolishResult)
            .unwrap_or(RecognizerEvent::Ignored),
        _ => RecognizerEvent::Ignored,
    }
}

fn text_of(payload: &Value) -> Option<String> {
    payload.as_str().map(str::to_string)
}

/// `FinalResult` is either the text or `[text, audio_duration_ms]`
fn final_text_of(payload: &Value) -> Option<String> {
    match payload {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => items.first().and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

fn error_detail(payload: &Value) -> String {
    match payload {
        Value::Null => String::new(),
        Value::String(detail) => detail.clone(),
        other => other.to_string(),
    }
}
