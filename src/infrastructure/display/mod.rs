//! Display surface adapters

mod terminal;

pub use terminal::{format_view, TerminalSurface};
