//! Sayble - push-to-talk dictation session coordinator
//!
//! Coordinates an external streaming speech recognizer: triggers start and
//! stop a recording session, recognizer events are filtered by session
//! generation, the final text is written to the focused application exactly
//! once, and a floating indicator mirrors the session.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Session registry, event normalization, display model, config
//! - **Application**: Recording controller, display state machine, output
//!   dispatcher, buses, and port interfaces (traits)
//! - **Infrastructure**: Adapters (recognizer process, clipboard, keyboard,
//!   notifications, terminal display, config store)
//! - **CLI**: Command-line interface, daemon, IPC and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
