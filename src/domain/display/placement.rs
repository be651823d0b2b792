//! Window placement for the floating indicator

/// Logical width of the indicator window
pub const WINDOW_WIDTH: f64 = 300.0;

/// Logical height of the indicator window
pub const WINDOW_HEIGHT: f64 = 52.0;

/// Gap between the window and the bottom edge of the screen
pub const BOTTOM_MARGIN: f64 = 60.0;

/// Physical size and scale factor of a monitor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorGeometry {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f64,
}

impl MonitorGeometry {
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    /// Logical (width, height); a non-positive scale factor counts as 1
    pub fn logical_size(&self) -> (f64, f64) {
        let scale = if self.scale_factor > 0.0 {
            self.scale_factor
        } else {
            1.0
        };
        (self.width as f64 / scale, self.height as f64 / scale)
    }
}

/// Top-left corner of a window in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalPosition {
    pub x: i32,
    pub y: i32,
}

/// Horizontally centred, `BOTTOM_MARGIN` above the bottom edge
pub fn bottom_center(monitor: &MonitorGeometry) -> LogicalPosition {
    let (width, height) = monitor.logical_size();
    LogicalPosition {
        x: ((width - WINDOW_WIDTH) / 2.0).round() as i32,
        y: (height - WINDOW_HEIGHT - BOTTOM_MARGIN).round() as i32,
    }
}
