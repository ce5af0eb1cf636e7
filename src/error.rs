//! Error types for the chime-daemon.
//!
//! Defines all error codes and types used throughout the daemon for
//! consistent error handling and reporting.

use std::fmt;

use crate::types::ChimeType;

/// Error codes returned by the daemon in error responses.
///
/// These codes are used in JSON-RPC error responses and allow clients
/// to programmatically handle specific error conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Requested soundpack is not among the discovered candidates.
    /// Trigger: Name typed by the user, or a pack directory removed since the last scan.
    SoundpackNotFound,

    /// Candidate directory lacks the mandatory `hour` chime.
    /// Trigger: No `hour.wav`/`hour.flac`/`hour.ogg`/`hour.mp3` in the pack directory.
    ValidationFailed,

    /// The audio collaborator rejected a file.
    /// Trigger: Missing, unreadable, or unsupported audio file; no output device.
    PlaybackFailed,

    /// The soundpack root directory could not be listed.
    /// Trigger: Root missing or permission denied.
    DiscoveryFailed,

    /// The settings file could not be written.
    /// Trigger: Read-only config directory, disk full.
    SettingsFailed,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::SoundpackNotFound => "SOUNDPACK_NOT_FOUND",
            ErrorCode::ValidationFailed => "SOUNDPACK_INVALID",
            ErrorCode::PlaybackFailed => "PLAYBACK_FAILED",
            ErrorCode::DiscoveryFailed => "DISCOVERY_FAILED",
            ErrorCode::SettingsFailed => "SETTINGS_FAILED",
        }
    }

    /// Returns a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::SoundpackNotFound => "Soundpack is not among the discovered candidates",
            ErrorCode::ValidationFailed => "Soundpack directory lacks the mandatory hour chime",
            ErrorCode::PlaybackFailed => "Audio file could not be played",
            ErrorCode::DiscoveryFailed => "Soundpack root directory could not be read",
            ErrorCode::SettingsFailed => "Settings file could not be written",
        }
    }

    /// Returns a recovery hint suggesting how to resolve this error.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCode::SoundpackNotFound => {
                "Run discover_soundpacks to refresh the list, \
                 then pick one of the returned names"
            }
            ErrorCode::ValidationFailed => {
                "Add an hour chime (hour.wav, hour.flac, hour.ogg or hour.mp3) \
                 to the soundpack directory and try again"
            }
            ErrorCode::PlaybackFailed => {
                "Check that the file exists and is a supported audio format, \
                 and that an audio output device is available"
            }
            ErrorCode::DiscoveryFailed => {
                "Create the soundpack directory or point CHIME_SOUNDPACKS_PATH \
                 at a readable directory containing one folder per soundpack"
            }
            ErrorCode::SettingsFailed => {
                "Check permissions on the config directory, \
                 or point CHIME_SETTINGS_PATH at a writable location"
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for daemon operations.
#[derive(Debug)]
pub struct ChimeError {
    /// The error code identifying the type of error.
    pub code: ErrorCode,
    /// Human-readable error message with context.
    pub message: String,
    /// Chime types whose absence caused a validation failure.
    pub missing: Vec<ChimeType>,
    /// Optional underlying cause of the error.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ChimeError {
    /// Creates a new ChimeError with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            missing: Vec::new(),
            source: None,
        }
    }

    /// Creates a new ChimeError with an underlying cause.
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            missing: Vec::new(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a SOUNDPACK_NOT_FOUND error.
    pub fn soundpack_not_found(name: &str) -> Self {
        Self::new(
            ErrorCode::SoundpackNotFound,
            format!("Soundpack not found: {}", name),
        )
    }

    /// Creates a SOUNDPACK_INVALID error listing the missing chimes.
    pub fn validation_failed(name: &str, missing: &[ChimeType]) -> Self {
        let names: Vec<&str> = missing.iter().map(ChimeType::as_str).collect();
        Self {
            missing: missing.to_vec(),
            ..Self::new(
                ErrorCode::ValidationFailed,
                format!(
                    "Soundpack '{}' is missing required chime(s): {}",
                    name,
                    names.join(", ")
                ),
            )
        }
    }

    /// Creates a PLAYBACK_FAILED error.
    pub fn playback_failed(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::PlaybackFailed,
            format!("Playback failed: {}", reason.into()),
        )
    }

    /// Creates a DISCOVERY_FAILED error wrapping the underlying I/O error.
    pub fn discovery_failed(root: &std::path::Path, source: std::io::Error) -> Self {
        Self::with_source(
            ErrorCode::DiscoveryFailed,
            format!("Cannot read soundpack directory {}: {}", root.display(), source),
            source,
        )
    }

    /// Creates a SETTINGS_FAILED error.
    pub fn settings_failed(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::SettingsFailed,
            format!("Failed to save settings: {}", reason.into()),
        )
    }
}

impl fmt::Display for ChimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}. Recovery: {}",
            self.code,
            self.message,
            self.code.recovery_hint()
        )
    }
}

impl std::error::Error for ChimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias using ChimeError.
pub type Result<T> = std::result::Result<T, ChimeError>;
