//! Audio playback collaborator.
//!
//! The scheduler hands a file path and a volume to an [`AudioPlayer`] and
//! moves on. Implementations must return quickly; playback itself happens
//! elsewhere.

use std::path::Path;

use hound::WavReader;

use crate::error::{ChimeError, Result};
use crate::soundpack::extension_priority;

/// Default playback volume in percent.
pub const DEFAULT_VOLUME: u8 = 50;

/// Plays an audio file without blocking the caller.
pub trait AudioPlayer: Send + Sync {
    /// Starts playback of `path` at `volume_percent` (0-100).
    ///
    /// Returns a PLAYBACK_FAILED error if the file cannot be played.
    fn play(&self, path: &Path, volume_percent: u8) -> Result<()>;
}

/// Clamps an arbitrary volume to 0-100.
pub fn clamp_volume(volume: i64) -> u8 {
    volume.clamp(0, 100) as u8
}

/// Converts a volume percentage to a linear gain (0.0-1.0).
pub fn volume_to_gain(volume_percent: u8) -> f32 {
    f32::from(volume_percent.min(100)) / 100.0
}

/// Checks that `path` is something a player can open.
///
/// The file must exist, be a regular file, and carry a supported extension.
/// WAV headers are parsed so truncated or non-PCM files fail here rather
/// than on the playback thread.
pub fn preflight(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(ChimeError::playback_failed(format!(
            "audio file not found: {}",
            path.display()
        )));
    }

    match extension_priority(path) {
        None => Err(ChimeError::playback_failed(format!(
            "unsupported audio format: {}",
            path.display()
        ))),
        Some(0) => {
            WavReader::open(path).map_err(|e| {
                ChimeError::with_source(
                    crate::error::ErrorCode::PlaybackFailed,
                    format!("Playback failed: unreadable WAV file {}", path.display()),
                    e,
                )
            })?;
            Ok(())
        }
        Some(_) => Ok(()),
    }
}

/// Player that validates and logs instead of producing sound.
///
/// Used when the daemon is built without the `playback` feature or run with
/// `--dry-run`.
#[derive(Debug, Default)]
pub struct DryRunPlayer;

impl AudioPlayer for DryRunPlayer {
    fn play(&self, path: &Path, volume_percent: u8) -> Result<()> {
        preflight(path)?;
        tracing::info!(path = %path.display(), volume = volume_percent, "dry-run playback");
        Ok(())
    }
}
