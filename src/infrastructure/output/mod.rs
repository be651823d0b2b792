//! Output sink adapters

mod system;

pub use system::SystemOutputSink;
