//! Config store adapters

mod xdg;

pub use xdg::{XdgConfigStore, APP_DIR_NAME};
