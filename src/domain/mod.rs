//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod action;
pub mod config;
pub mod display;
pub mod error;
pub mod event;
pub mod output;
pub mod recording;
pub mod session;

// Re-export common types
pub use action::{ControlAction, ControlMessage, HotkeyAction};
pub use config::{AppConfig, Credentials};
pub use error::*;
pub use event::{EventEnvelope, RecognizerEvent};
pub use output::{OutputMode, OutputPolicy};
pub use recording::Duration;
pub use session::{Admission, Generation, Session, SessionPhase, SessionRegistry};
