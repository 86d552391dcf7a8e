//! TOML-based settings.
//!
//! Holds the workout configuration and a few front-end preferences:
//! - Interval durations and cycle count (`[timer]`)
//! - Initial mute state (`[audio]`)
//! - Whether to hold a keep-awake lock while running (`[power]`)
//!
//! Settings are read-only. The file is looked up at `--config`, then
//! `$INTERVAL_TIMER_CONFIG`, then `<config dir>/interval-timer/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::config_dir;
use crate::error::ConfigError;
use crate::timer::IntervalConfig;

pub const CONFIG_ENV: &str = "INTERVAL_TIMER_CONFIG";

/// Audio configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default)]
    pub muted: bool,
}

/// Keep-awake configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerConfig {
    #[serde(default = "default_true")]
    pub keep_awake: bool,
}

/// Application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub timer: IntervalConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub power: PowerConfig,
}

fn default_true() -> bool {
    true
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self { keep_awake: true }
    }
}

impl Settings {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Default location of the settings file, if a config dir exists.
    pub fn default_path() -> Option<PathBuf> {
        config_dir().map(|d| d.join("config.toml"))
    }

    /// Resolve which file to read, without touching the filesystem.
    ///
    /// The returned flag is true when the path was asked for explicitly,
    /// in which case a missing file is an error.
    pub fn resolve_path(explicit: Option<&Path>) -> Option<(PathBuf, bool)> {
        if let Some(path) = explicit {
            return Some((path.to_path_buf(), true));
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some((PathBuf::from(path), true));
        }
        Self::default_path().map(|p| (p, false))
    }

    /// Load settings.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly requested file cannot be read, or
    /// if any settings file that exists cannot be parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match Self::resolve_path(explicit) {
            Some((path, required)) => Self::load_from(&path, required),
            None => Ok(Self::default()),
        }
    }

    fn load_from(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        Self::parse(&content).map_err(|message| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse settings from TOML text.
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Get a settings value as string by dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownKey`] for keys that do not exist.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let json = serde_json::to_value(self)
            .map_err(|_| ConfigError::UnknownKey(key.to_string()))?;
        match Self::get_json_value_by_path(&json, key) {
            Some(serde_json::Value::String(s)) => Ok(s.clone()),
            Some(other) => Ok(other.to_string()),
            None => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let s = Settings::parse("").unwrap();
        assert_eq!(s.timer, IntervalConfig::default());
        assert!(!s.audio.muted);
        assert!(s.power.keep_awake);
    }

    #[test]
    fn partial_timer_section_keeps_other_defaults() {
        let s = Settings::parse("[timer]\nwork_secs = 45\ncycles = 8\n").unwrap();
        assert_eq!(s.timer.work_secs(), 45);
        assert_eq!(s.timer.cycles(), 8);
        assert_eq!(s.timer.pause_secs(), 15);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let s = Settings::parse("[timer]\nwork_secs = 0\nwarning_secs = -2\n").unwrap();
        assert_eq!(s.timer.work_secs(), 1);
        assert_eq!(s.timer.warning_secs(), 1);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(Settings::parse("[timer\nwork_secs = ").is_err());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let s = Settings::default();
        assert_eq!(s.get("timer.work_secs").unwrap(), "30");
        assert_eq!(s.get("audio.muted").unwrap(), "false");
        assert!(matches!(
            s.get("timer.missing"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(
            Settings::load(Some(&path)),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn explicit_file_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[audio]\nmuted = true\n[power]\nkeep_awake = false").unwrap();
        let s = Settings::load(Some(file.path())).unwrap();
        assert!(s.audio.muted);
        assert!(!s.power.keep_awake);
    }
}
