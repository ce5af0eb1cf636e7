//! Sound asset validation.
//!
//! Resolves logical chime names to audio files inside a directory by file
//! stem, without opening or decoding anything.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::types::ChimeType;

/// Supported audio extensions, highest priority first.
///
/// Uncompressed PCM wins over lossless, lossless over lossy.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["wav", "flac", "ogg", "mp3"];

/// Resolved chime files for one directory.
pub type ChimeMap = BTreeMap<ChimeType, PathBuf>;

/// Returns the priority of `path`'s extension, or None if unsupported.
///
/// Lower is better. Matching is ASCII case-insensitive.
pub fn extension_priority(path: &Path) -> Option<usize> {
    let ext = path.extension()?.to_str()?;
    SUPPORTED_EXTENSIONS
        .iter()
        .position(|supported| supported.eq_ignore_ascii_case(ext))
}

/// Resolves each of `chimes` to a file in `dir`.
///
/// A chime resolves when `dir` holds a regular file whose stem equals the
/// chime name (case-insensitive) and whose extension is supported. When
/// several files match, the best extension priority wins; ties go to the
/// lexicographically smallest file name. An unreadable or missing
/// directory resolves nothing.
pub fn resolve_chimes(dir: &Path, chimes: &[ChimeType]) -> ChimeMap {
    let mut best: BTreeMap<ChimeType, (usize, PathBuf)> = BTreeMap::new();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "cannot list soundpack directory");
            return ChimeMap::new();
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(priority) = extension_priority(&path) else {
            continue;
        };
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(chime) = chimes
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(stem))
        else {
            continue;
        };

        let replace = match best.get(&chime) {
            None => true,
            Some((current_priority, current_path)) => {
                priority < *current_priority
                    || (priority == *current_priority
                        && path.file_name() < current_path.file_name())
            }
        };
        if replace {
            best.insert(chime, (priority, path));
        }
    }

    best.into_iter().map(|(chime, (_, path))| (chime, path)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn resolves_present_chimes_only() {
        let dir = tempdir().unwrap();
        let hour = touch(dir.path(), "hour.wav");
        let half = touch(dir.path(), "half.ogg");

        let map = resolve_chimes(dir.path(), &ChimeType::ALL);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&ChimeType::Hour), Some(&hour));
        assert_eq!(map.get(&ChimeType::Half), Some(&half));
        assert!(map.get(&ChimeType::Quarter).is_none());
    }

    #[test]
    fn extension_priority_is_deterministic() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "hour.mp3");
        touch(dir.path(), "hour.ogg");
        let wav = touch(dir.path(), "hour.wav");
        touch(dir.path(), "hour.flac");

        let map = resolve_chimes(dir.path(), &[ChimeType::Hour]);
        assert_eq!(map.get(&ChimeType::Hour), Some(&wav));
    }

    #[test]
    fn same_extension_tie_picks_smallest_name() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "hour.wav");
        let upper = touch(dir.path(), "HOUR.wav");
        touch(dir.path(), "Hour.WAV");

        let map = resolve_chimes(dir.path(), &[ChimeType::Hour]);
        assert_eq!(map.get(&ChimeType::Hour), Some(&upper));
    }

    #[test]
    fn matching_ignores_ascii_case() {
        let dir = tempdir().unwrap();
        let path = touch(dir.path(), "Quarter.OGG");

        let map = resolve_chimes(dir.path(), &ChimeType::ALL);
        assert_eq!(map.get(&ChimeType::Quarter), Some(&path));
    }

    #[test]
    fn ignores_unsupported_files_and_directories() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "hour.txt");
        touch(dir.path(), "hour");
        fs::create_dir(dir.path().join("half.wav")).unwrap();
        touch(dir.path(), "chime.wav");

        let map = resolve_chimes(dir.path(), &ChimeType::ALL);
        assert!(map.is_empty());
    }

    #[test]
    fn only_requested_chimes_resolve() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "hour.wav");
        touch(dir.path(), "half.wav");

        let map = resolve_chimes(dir.path(), &[ChimeType::Half]);
        assert_eq!(map.len(), 1);
        assert!(map.contains_key(&ChimeType::Half));
    }

    #[test]
    fn missing_directory_resolves_nothing() {
        let dir = tempdir().unwrap();
        let map = resolve_chimes(&dir.path().join("absent"), &ChimeType::ALL);
        assert!(map.is_empty());
    }

    #[test]
    fn extension_priority_order() {
        assert_eq!(extension_priority(Path::new("a.wav")), Some(0));
        assert_eq!(extension_priority(Path::new("a.FLAC")), Some(1));
        assert_eq!(extension_priority(Path::new("a.mp3")), Some(3));
        assert_eq!(extension_priority(Path::new("a.aiff")), None);
        assert_eq!(extension_priority(Path::new("a")), None);
    }
}
