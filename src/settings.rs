//! User settings file.
//!
//! The daemon reads the user's chime preferences from a flat JSON file and
//! writes them back after changes made over JSON-RPC. A missing or broken
//! file yields defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::audio::{clamp_volume, DEFAULT_VOLUME};
use crate::error::{ChimeError, ErrorCode, Result};
use crate::scheduler::IntervalSwitches;
use crate::types::{QuietHours, WallTime};

/// Soundpack selected when the settings name none.
pub const DEFAULT_SOUNDPACK: &str = "default";

/// Persistent user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Playback volume (0-100).
    #[serde(deserialize_with = "deserialize_volume")]
    pub volume: u8,
    /// Name of the selected soundpack directory.
    pub soundpack: String,
    pub chime_hourly: bool,
    pub chime_half_hour: bool,
    pub chime_quarter_hour: bool,
    pub quiet_hours_enabled: bool,
    /// Start of quiet hours, `HH:MM`.
    pub quiet_start: String,
    /// End of quiet hours, `HH:MM`.
    pub quiet_end: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            soundpack: DEFAULT_SOUNDPACK.to_string(),
            chime_hourly: true,
            chime_half_hour: false,
            chime_quarter_hour: false,
            quiet_hours_enabled: false,
            quiet_start: "22:00".to_string(),
            quiet_end: "07:00".to_string(),
        }
    }
}

impl Settings {
    /// Returns the enabled chime intervals.
    pub fn intervals(&self) -> IntervalSwitches {
        IntervalSwitches {
            hourly: self.chime_hourly,
            half: self.chime_half_hour,
            quarter: self.chime_quarter_hour,
        }
    }

    pub fn set_intervals(&mut self, intervals: IntervalSwitches) {
        self.chime_hourly = intervals.hourly;
        self.chime_half_hour = intervals.half;
        self.chime_quarter_hour = intervals.quarter;
    }

    /// Returns the quiet window if enabled and both bounds parse.
    pub fn quiet_hours(&self) -> Option<QuietHours> {
        if !self.quiet_hours_enabled {
            return None;
        }
        match (WallTime::parse(&self.quiet_start), WallTime::parse(&self.quiet_end)) {
            (Some(start), Some(end)) => Some(QuietHours::new(start, end)),
            _ => {
                tracing::warn!(
                    start = %self.quiet_start,
                    end = %self.quiet_end,
                    "ignoring quiet hours with invalid bounds"
                );
                None
            }
        }
    }

    /// Enables the given quiet window, or disables quiet hours.
    pub fn set_quiet_hours(&mut self, quiet_hours: Option<QuietHours>) {
        match quiet_hours {
            Some(q) => {
                self.quiet_hours_enabled = true;
                self.quiet_start = q.start.to_string();
                self.quiet_end = q.end.to_string();
            }
            None => self.quiet_hours_enabled = false,
        }
    }
}

/// Accepts any JSON number and clamps it to 0-100; anything else is the default.
fn deserialize_volume<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(clamp_volume)
            .unwrap_or(DEFAULT_VOLUME),
        _ => DEFAULT_VOLUME,
    })
}

/// Loads settings from `path`. Returns defaults if the file is missing or invalid.
pub fn load_settings(path: &Path) -> Settings {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Settings::default();
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "cannot read settings, using defaults"
            );
            return Settings::default();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "invalid settings file, using defaults"
            );
            Settings::default()
        }
    }
}

/// Saves settings to `path`, creating parent directories as needed.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ChimeError::with_source(
                ErrorCode::SettingsFailed,
                format!("Failed to create {}", parent.display()),
                e,
            )
        })?;
    }

    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| ChimeError::settings_failed(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| {
        ChimeError::with_source(
            ErrorCode::SettingsFailed,
            format!("Failed to write {}", path.display()),
            e,
        )
    })?;

    tracing::debug!(path = %path.display(), "settings saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings(&dir.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.intervals(), IntervalSwitches::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        settings.soundpack = "classic".to_string();
        settings.volume = 80;
        settings.set_intervals(IntervalSwitches {
            hourly: true,
            half: true,
            quarter: false,
        });
        save_settings(&path, &settings).unwrap();

        assert_eq!(load_settings(&path), settings);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"soundpack": "digital", "chime_quarter_hour": true}"#).unwrap();

        let settings = load_settings(&path);
        assert_eq!(settings.soundpack, "digital");
        assert!(settings.chime_hourly);
        assert!(settings.chime_quarter_hour);
        assert_eq!(settings.volume, DEFAULT_VOLUME);
    }

    #[test]
    fn volume_is_clamped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        fs::write(&path, r#"{"volume": 400}"#).unwrap();
        assert_eq!(load_settings(&path).volume, 100);

        fs::write(&path, r#"{"volume": -3}"#).unwrap();
        assert_eq!(load_settings(&path).volume, 0);

        fs::write(&path, r#"{"volume": "loud"}"#).unwrap();
        assert_eq!(load_settings(&path).volume, DEFAULT_VOLUME);
    }

    #[test]
    fn invalid_json_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ nope").unwrap();
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn quiet_hours_round_trip_through_settings() {
        let mut settings = Settings::default();
        assert!(settings.quiet_hours().is_none());

        let window = QuietHours::new(WallTime::new(23, 0).unwrap(), WallTime::new(6, 30).unwrap());
        settings.set_quiet_hours(Some(window));
        assert_eq!(settings.quiet_start, "23:00");
        assert_eq!(settings.quiet_hours(), Some(window));

        settings.set_quiet_hours(None);
        assert!(settings.quiet_hours().is_none());
    }

    #[test]
    fn invalid_quiet_bounds_are_ignored() {
        let settings = Settings {
            quiet_hours_enabled: true,
            quiet_start: "late".to_string(),
            ..Settings::default()
        };
        assert!(settings.quiet_hours().is_none());
    }
}
