//! Test doubles for the playback collaborator.

use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};
use parking_lot::Mutex;

use super::player::AudioPlayer;
use crate::error::{ChimeError, Result};

/// Writes a short silent mono WAV file to `path`.
pub fn write_test_wav(path: &Path) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for _ in 0..80 {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();
}

/// Records every play request; optionally fails them all.
#[derive(Debug, Default)]
pub struct RecordingPlayer {
    plays: Mutex<Vec<(PathBuf, u8)>>,
    fail: bool,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A player that records requests and then rejects them.
    pub fn failing() -> Self {
        Self {
            plays: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn plays(&self) -> Vec<(PathBuf, u8)> {
        self.plays.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.plays.lock().len()
    }
}

impl AudioPlayer for RecordingPlayer {
    fn play(&self, path: &Path, volume_percent: u8) -> Result<()> {
        self.plays.lock().push((path.to_path_buf(), volume_percent));
        if self.fail {
            Err(ChimeError::playback_failed("device unavailable"))
        } else {
            Ok(())
        }
    }
}
