//! Recording domain module

mod duration;

pub use duration::{
    Duration, DEFAULT_ERROR_HIDE_DELAY_MS, DEFAULT_HIDE_DELAY_MS, DEFAULT_MAX_DURATION_SECS,
    DEFAULT_MIN_RECORDING_MS,
};
