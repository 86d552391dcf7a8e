//! Core error types for interval-core.
//!
//! None of these are fatal to the phase engine. Configuration input is
//! clamped rather than rejected. [`CueError`] and [`WakeLockError`] come
//! from collaborator backends and are absorbed by the listeners that drive
//! them, so only settings loading and a closed driver reach [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for interval-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The tick driver has shut down and no longer accepts intents
    #[error("Timer driver is no longer running")]
    DriverClosed,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the settings file
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Settings file is not valid TOML or has the wrong shape
    #[error("Failed to parse configuration at {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },

    /// Lookup of a key that does not exist
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Cue playback errors.
#[derive(Error, Debug)]
pub enum CueError {
    /// No audio backend is available
    #[error("Audio output unavailable: {0}")]
    Unavailable(String),

    /// Backend was present but playback failed
    #[error("Cue playback failed: {0}")]
    PlaybackFailed(#[from] std::io::Error),
}

/// Keep-awake errors.
#[derive(Error, Debug)]
pub enum WakeLockError {
    /// The platform has no way to hold a keep-awake lock
    #[error("Keep-awake is not supported on this system: {0}")]
    Unsupported(String),

    /// The platform refused the request
    #[error("Keep-awake request denied: {0}")]
    Denied(String),

    /// Releasing a held lock failed
    #[error("Failed to release keep-awake lock: {0}")]
    ReleaseFailed(String),
}

impl From<std::io::Error> for WakeLockError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => WakeLockError::Unsupported(err.to_string()),
            _ => WakeLockError::Denied(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
