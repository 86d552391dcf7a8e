mod config;

pub use config::{AudioConfig, PowerConfig, Settings, CONFIG_ENV};

use std::path::PathBuf;

/// Returns `<config dir>/interval-timer[-dev]/` based on INTERVAL_TIMER_ENV.
///
/// Set INTERVAL_TIMER_ENV=dev to read a development settings directory.
/// Nothing is created; the directory may not exist.
pub fn config_dir() -> Option<PathBuf> {
    let base_dir = dirs::config_dir()?;

    let env = std::env::var("INTERVAL_TIMER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("interval-timer-dev")
    } else {
        base_dir.join("interval-timer")
    };
    Some(dir)
}
