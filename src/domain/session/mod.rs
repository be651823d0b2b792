//! Session domain module

mod phase;
mod registry;
#[allow(clippy::module_inception)]
mod session;

pub use phase::SessionPhase;
pub use registry::{Admission, Generation, SessionRegistry};
pub use session::{InvalidPhaseTransition, Session};
