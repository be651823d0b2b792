//! Output domain module

mod mode;

pub use mode::{OutputMode, OutputPolicy, ALL_OUTPUT_MODES};
