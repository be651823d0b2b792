//! Recognizer event model

mod envelope;
mod normalizer;

pub use envelope::EventEnvelope;
pub use normalizer::{normalize, normalize_str, RecognizerEvent};
