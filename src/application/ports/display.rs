//! Floating display surface port
//!
//! The surface is a dumb window: it is positioned, shown, hidden and given a
//! view to draw. All timing and state decisions live in the display state
//! machine.

use thiserror::Error;

use crate::domain::display::{DisplayView, LogicalPosition, MonitorGeometry};

/// Display surface errors
#[derive(Debug, Clone, Error)]
pub enum DisplayError {
    #[error("Display surface unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to update display: {0}")]
    UpdateFailed(String),
}

/// Port for the floating indicator window
pub trait DisplaySurface: Send + Sync + 'static {
    /// Geometry of the monitor the window should appear on, if known
    fn monitor(&self) -> Option<MonitorGeometry>;

    /// Move the window to `position` (when given) and make it visible
    fn show_at(&self, position: Option<LogicalPosition>) -> Result<(), DisplayError>;

    /// Make the window invisible
    fn hide(&self) -> Result<(), DisplayError>;

    /// Draw `view`
    fn render(&self, view: &DisplayView) -> Result<(), DisplayError>;
}
