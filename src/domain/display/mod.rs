//! Floating display value objects

mod placement;
mod status;
mod view;

pub use placement::{
    bottom_center, LogicalPosition, MonitorGeometry, BOTTOM_MARGIN, WINDOW_HEIGHT, WINDOW_WIDTH,
};
pub use status::DisplayStatus;
pub use view::{format_elapsed, DisplayView};
