//! Application layer - Use cases and port interfaces
//!
//! Contains the recording controller, the floating display state machine,
//! the output dispatcher and the buses that connect them, plus the trait
//! definitions for external system interactions.

pub mod bus;
pub mod controller;
pub mod dispatcher;
pub mod display;
pub mod ports;

pub use bus::{Bus, ControlBus, EventBus, Subscription};
pub use controller::{
    ControllerConfig, ControllerError, EventOutcome, RecordingController,
};
pub use dispatcher::{CommitOutcome, OutputDispatcher};
pub use display::{DisplayTiming, FloatingDisplay};
