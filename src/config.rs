//! Daemon configuration module.
//!
//! Contains the runtime configuration for the chime-daemon: where the
//! soundpacks live, where user settings are stored, and how often the
//! scheduler ticks.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default tick period in milliseconds.
pub const DEFAULT_TICK_MS: u64 = 1000;

/// Shortest accepted tick period.
pub const MIN_TICK_MS: u64 = 100;

/// Longest accepted tick period. Anything longer could skip a whole minute.
pub const MAX_TICK_MS: u64 = 30_000;

/// Runtime configuration for the daemon.
///
/// This configuration is typically loaded from environment variables at
/// startup and then overridden by command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Directory containing one subdirectory per soundpack.
    /// If None, uses the platform-specific default data location.
    pub soundpacks_path: Option<PathBuf>,

    /// Path to the user settings file.
    /// If None, uses the platform-specific default config location.
    pub settings_path: Option<PathBuf>,

    /// Scheduler tick period in milliseconds.
    pub tick_ms: u64,
}

impl DaemonConfig {
    /// Creates a new DaemonConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a DaemonConfig from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `CHIME_SOUNDPACKS_PATH` - Directory containing soundpacks
    /// - `CHIME_SETTINGS_PATH` - Path to the settings JSON file
    /// - `CHIME_TICK_MS` - Tick period in milliseconds
    ///
    /// Falls back to defaults for unset or unparsable variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("CHIME_SOUNDPACKS_PATH") {
            config.soundpacks_path = Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("CHIME_SETTINGS_PATH") {
            config.settings_path = Some(PathBuf::from(path));
        }

        if let Ok(tick_str) = std::env::var("CHIME_TICK_MS") {
            if let Ok(tick_ms) = tick_str.parse::<u64>() {
                config.tick_ms = tick_ms;
            }
        }

        config
    }

    /// Returns the effective soundpack root, using platform defaults if not specified.
    pub fn effective_soundpacks_path(&self) -> PathBuf {
        if let Some(ref path) = self.soundpacks_path {
            path.clone()
        } else {
            default_soundpacks_path()
        }
    }

    /// Returns the effective settings file path, using platform defaults if not specified.
    pub fn effective_settings_path(&self) -> PathBuf {
        if let Some(ref path) = self.settings_path {
            path.clone()
        } else {
            default_settings_path()
        }
    }

    /// Returns the tick period.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails, None otherwise.
    pub fn validate(&self) -> Option<String> {
        if !(MIN_TICK_MS..=MAX_TICK_MS).contains(&self.tick_ms) {
            return Some(format!(
                "tick_ms must be between {} and {}, got {}",
                MIN_TICK_MS, MAX_TICK_MS, self.tick_ms
            ));
        }

        None
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            soundpacks_path: None,
            settings_path: None,
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

/// Returns the platform-specific default soundpack directory.
///
/// Uses the `directories` crate to find appropriate locations:
/// - macOS: ~/Library/Application Support/chime-daemon/soundpacks
/// - Linux: ~/.local/share/chime-daemon/soundpacks
/// - Windows: C:\Users\<user>\AppData\Roaming\chime-daemon\data\soundpacks
fn default_soundpacks_path() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "chime-daemon") {
        proj_dirs.data_dir().join("soundpacks")
    } else {
        // Fallback to current directory
        PathBuf::from("./soundpacks")
    }
}

/// Returns the platform-specific default settings file.
///
/// - macOS: ~/Library/Application Support/chime-daemon/settings.json
/// - Linux: ~/.config/chime-daemon/settings.json
/// - Windows: C:\Users\<user>\AppData\Roaming\chime-daemon\config\settings.json
fn default_settings_path() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "chime-daemon") {
        proj_dirs.config_dir().join("settings.json")
    } else {
        PathBuf::from("./settings.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_validation() {
        let mut config = DaemonConfig::new();
        assert!(config.validate().is_none());

        config.tick_ms = 50;
        assert!(config.validate().is_some());

        config.tick_ms = 60_000;
        assert!(config.validate().is_some());

        config.tick_ms = 500;
        assert!(config.validate().is_none());
    }

    #[test]
    fn effective_paths() {
        let config = DaemonConfig::new();
        assert!(!config.effective_soundpacks_path().as_os_str().is_empty());
        assert!(config
            .effective_settings_path()
            .to_string_lossy()
            .ends_with("settings.json"));
    }

    #[test]
    fn explicit_paths_override_defaults() {
        let config = DaemonConfig {
            soundpacks_path: Some(PathBuf::from("/srv/packs")),
            settings_path: Some(PathBuf::from("/srv/settings.json")),
            ..DaemonConfig::default()
        };
        assert_eq!(config.effective_soundpacks_path(), PathBuf::from("/srv/packs"));
        assert_eq!(config.effective_settings_path(), PathBuf::from("/srv/settings.json"));
    }

    #[test]
    fn tick_period_from_ms() {
        let config = DaemonConfig::new();
        assert_eq!(config.tick_period(), Duration::from_secs(1));
    }
}
