//! Soundpack registry with a no-eviction cache.
//!
//! Discovers candidate directories under a root, lazily loads and caches
//! [`Soundpack`] instances, and tracks the active one. The set of installed
//! packs is small, so loaded packs stay cached for the registry's lifetime.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::pack::Soundpack;
use crate::error::{ChimeError, Result};

/// Discovers, loads, and switches between soundpacks under one root.
///
/// All methods take `&self`; the registry is shared between the tick thread
/// and whatever control path switches packs.
pub struct SoundpackRegistry {
    /// Directory scanned for candidate packs.
    root: PathBuf,
    /// Candidate names from the last scan, sorted.
    discovered: RwLock<Vec<String>>,
    /// Loaded packs indexed by name.
    cache: Mutex<HashMap<String, Arc<Soundpack>>>,
    /// Active pack. Only ever set to a loaded pack.
    current: RwLock<Option<Arc<Soundpack>>>,
}

impl SoundpackRegistry {
    /// Creates a registry for `root`. Nothing is scanned until [`discover`](Self::discover).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            discovered: RwLock::new(Vec::new()),
            cache: Mutex::new(HashMap::new()),
            current: RwLock::new(None),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists immediate subdirectories of the root, sorted lexicographically.
    ///
    /// Every subdirectory is a candidate; validity is only checked on load.
    /// Fails if the root cannot be read.
    pub fn discover(&self) -> Result<Vec<String>> {
        let entries =
            std::fs::read_dir(&self.root).map_err(|e| ChimeError::discovery_failed(&self.root, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ChimeError::discovery_failed(&self.root, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    tracing::debug!(name = ?raw, "skipping soundpack directory, name is not UTF-8");
                }
            }
        }
        names.sort();
        names.dedup();

        tracing::info!(root = %self.root.display(), count = names.len(), "discovered soundpacks");
        *self.discovered.write() = names.clone();
        Ok(names)
    }

    /// Returns the names found by the last [`discover`](Self::discover).
    pub fn discovered(&self) -> Vec<String> {
        self.discovered.read().clone()
    }

    /// Returns the loaded pack `name`, loading and caching it on first use.
    ///
    /// Cached packs are returned without re-validation. Failed loads are not
    /// cached, so a retry after fixing the directory validates from scratch.
    pub fn load(&self, name: &str) -> Result<Arc<Soundpack>> {
        if !self.discovered.read().iter().any(|n| n == name) {
            return Err(ChimeError::soundpack_not_found(name));
        }

        if let Some(pack) = self.cache.lock().get(name) {
            return Ok(Arc::clone(pack));
        }

        let mut pack = Soundpack::new(name, self.root.join(name));
        if let Err(e) = pack.load() {
            tracing::warn!(soundpack = name, error = %e.message, "soundpack failed validation");
            return Err(e);
        }

        let pack = Arc::new(pack);
        let mut cache = self.cache.lock();
        // Another caller may have loaded the same pack meanwhile; keep the first.
        let cached = cache.entry(name.to_string()).or_insert_with(|| Arc::clone(&pack));
        Ok(Arc::clone(cached))
    }

    /// Loads `name` and makes it the active pack.
    ///
    /// On failure the previously active pack stays active.
    pub fn switch_to(&self, name: &str) -> Result<Arc<Soundpack>> {
        let pack = self.load(name)?;
        let previous = self.current.write().replace(Arc::clone(&pack));
        tracing::info!(
            soundpack = name,
            previous = previous.as_ref().map(|p| p.name()),
            "switched soundpack"
        );
        Ok(pack)
    }

    /// Returns the active pack, or None before the first successful switch.
    pub fn current(&self) -> Option<Arc<Soundpack>> {
        self.current.read().clone()
    }

    /// Drops `name` from the cache so the next load re-validates.
    ///
    /// The active pack is left untouched. Returns true if an entry was removed.
    pub fn invalidate(&self, name: &str) -> bool {
        self.cache.lock().remove(name).is_some()
    }

    /// Re-validates `name` from disk and caches the fresh result.
    pub fn refresh(&self, name: &str) -> Result<Arc<Soundpack>> {
        self.invalidate(name);
        self.load(name)
    }

    /// Returns true if `name` is currently cached.
    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.lock().contains_key(name)
    }
}
