mod config;
pub mod display;
mod engine;

pub use config::{
    IntervalConfig, Presets, RawIntervalConfig, MIN_CYCLES, MIN_DELAY_START_SECS,
    MIN_PAUSE_SECS, MIN_WARNING_SECS, MIN_WORK_SECS, PRESETS,
};
pub use display::Presentation;
pub use engine::{IntervalEngine, Phase, TimerSnapshot};
