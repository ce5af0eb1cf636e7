//! Soundpack entity.
//!
//! A Soundpack wraps one directory and maps chime types to the audio files
//! found there. It starts unloaded (metadata only) and is populated by
//! [`Soundpack::load`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::validator::{resolve_chimes, ChimeMap};
use crate::error::{ChimeError, Result};
use crate::types::ChimeType;

/// Optional metadata file inside a soundpack directory.
pub const MANIFEST_FILENAME: &str = "clock.json";

/// Descriptive metadata read from a soundpack's manifest.
///
/// Every field is optional; the manifest never affects whether a pack loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// A named, directory-backed collection of chime audio files.
#[derive(Debug, Clone)]
pub struct Soundpack {
    name: String,
    base_path: PathBuf,
    chime_paths: ChimeMap,
    manifest: Option<PackManifest>,
    loaded: bool,
}

impl Soundpack {
    /// Creates an unloaded soundpack for `base_path`.
    pub fn new(name: impl Into<String>, base_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            base_path: base_path.into(),
            chime_paths: ChimeMap::new(),
            manifest: None,
            loaded: false,
        }
    }

    /// Scans the directory and populates the chime paths.
    ///
    /// Succeeds iff the `hour` chime resolves. On failure the chime paths are
    /// left empty and the pack is marked unloaded. Every call rescans, so
    /// files swapped on disk are picked up.
    pub fn load(&mut self) -> Result<()> {
        let resolved = resolve_chimes(&self.base_path, &ChimeType::ALL);

        if !resolved.contains_key(&ChimeType::Hour) {
            self.chime_paths.clear();
            self.manifest = None;
            self.loaded = false;
            return Err(ChimeError::validation_failed(&self.name, &[ChimeType::Hour]));
        }

        self.chime_paths = resolved;
        self.manifest = read_manifest(&self.base_path);
        self.loaded = true;

        tracing::debug!(
            soundpack = %self.name,
            chimes = ?self.available_chimes(),
            "soundpack loaded"
        );
        Ok(())
    }

    /// Returns the resolved file for `chime`, or None if this pack lacks it.
    pub fn get_chime_path(&self, chime: ChimeType) -> Option<&Path> {
        self.chime_paths.get(&chime).map(PathBuf::as_path)
    }

    /// Returns the chime types this pack provides, in precedence order.
    pub fn available_chimes(&self) -> Vec<ChimeType> {
        self.chime_paths.keys().copied().collect()
    }

    /// Directory name of the pack.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Manifest name when present, otherwise the directory name.
    pub fn display_name(&self) -> &str {
        self.manifest
            .as_ref()
            .and_then(|m| m.name.as_deref())
            .unwrap_or(&self.name)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn manifest(&self) -> Option<&PackManifest> {
        self.manifest.as_ref()
    }

    /// True iff the last `load()` resolved at least the hour chime.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

/// Reads the optional manifest. Malformed files are logged and ignored.
fn read_manifest(dir: &Path) -> Option<PackManifest> {
    let path = dir.join(MANIFEST_FILENAME);
    let contents = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "ignoring malformed soundpack manifest"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn new_pack_is_unloaded() {
        let pack = Soundpack::new("classic", "/tmp/classic");
        assert!(!pack.is_loaded());
        assert!(pack.available_chimes().is_empty());
        assert_eq!(pack.name(), "classic");
    }

    #[test]
    fn load_hour_only_pack() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("hour.wav"), b"").unwrap();

        let mut pack = Soundpack::new("digital", dir.path());
        pack.load().unwrap();

        assert!(pack.is_loaded());
        assert_eq!(
            pack.get_chime_path(ChimeType::Hour),
            Some(dir.path().join("hour.wav").as_path())
        );
        assert!(pack.get_chime_path(ChimeType::Half).is_none());
        assert!(pack.get_chime_path(ChimeType::Quarter).is_none());
    }

    #[test]
    fn load_without_hour_fails() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("half.wav"), b"").unwrap();
        fs::write(dir.path().join("quarter.wav"), b"").unwrap();

        let mut pack = Soundpack::new("partial", dir.path());
        let err = pack.load().unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.missing, vec![ChimeType::Hour]);
        assert!(!pack.is_loaded());
        assert!(pack.available_chimes().is_empty());
    }

    #[test]
    fn reload_picks_up_changes() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("hour.wav"), b"").unwrap();

        let mut pack = Soundpack::new("classic", dir.path());
        pack.load().unwrap();
        assert!(pack.get_chime_path(ChimeType::Quarter).is_none());

        fs::write(dir.path().join("quarter.mp3"), b"").unwrap();
        pack.load().unwrap();
        assert!(pack.get_chime_path(ChimeType::Quarter).is_some());

        fs::remove_file(dir.path().join("hour.wav")).unwrap();
        assert!(pack.load().is_err());
        assert!(!pack.is_loaded());
        assert!(pack.get_chime_path(ChimeType::Quarter).is_none());
    }

    #[test]
    fn manifest_sets_display_name() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("hour.wav"), b"").unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILENAME),
            r#"{"name": "Grandfather Clock", "author": "someone", "version": "1.0"}"#,
        )
        .unwrap();

        let mut pack = Soundpack::new("grandfather", dir.path());
        pack.load().unwrap();

        assert_eq!(pack.display_name(), "Grandfather Clock");
        assert_eq!(pack.manifest().unwrap().version.as_deref(), Some("1.0"));
    }

    #[test]
    fn malformed_manifest_does_not_block_loading() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("hour.wav"), b"").unwrap();
        fs::write(dir.path().join(MANIFEST_FILENAME), "{ not json").unwrap();

        let mut pack = Soundpack::new("broken-meta", dir.path());
        pack.load().unwrap();

        assert!(pack.manifest().is_none());
        assert_eq!(pack.display_name(), "broken-meta");
    }
}
