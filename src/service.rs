//! UI-facing facade over the registry and scheduler.
//!
//! A host (the JSON-RPC server, the CLI) drives the daemon exclusively
//! through [`ChimeService`]. The scheduler sits behind a mutex so control
//! calls and ticks from the ticker thread serialize.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::audio::AudioPlayer;
use crate::error::Result;
use crate::scheduler::{ChimeScheduler, IntervalSwitches, TickOutcome};
use crate::settings::Settings;
use crate::soundpack::{Soundpack, SoundpackRegistry};
use crate::types::{ChimeType, QuietHours, WallTime};

/// Snapshot of the daemon's observable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    /// Directory name of the active soundpack.
    pub soundpack: Option<String>,
    /// Manifest name of the active soundpack.
    pub display_name: Option<String>,
    /// Chimes the active soundpack provides.
    pub chimes: Vec<ChimeType>,
    pub intervals: IntervalSwitches,
    pub volume: u8,
    pub quiet_hours: Option<QuietHours>,
    pub last_fired: Option<WallTime>,
}

/// Controls soundpack selection, chime settings, and ticking.
pub struct ChimeService {
    registry: Arc<SoundpackRegistry>,
    player: Arc<dyn AudioPlayer>,
    scheduler: Mutex<ChimeScheduler>,
}

impl ChimeService {
    /// Wraps an already configured scheduler.
    pub fn new(scheduler: ChimeScheduler) -> Self {
        Self {
            registry: Arc::clone(scheduler.registry()),
            player: Arc::clone(scheduler.player()),
            scheduler: Mutex::new(scheduler),
        }
    }

    /// Builds a service from user settings and selects the initial soundpack.
    ///
    /// Discovery failures are logged; the service still starts with no
    /// active pack so a later `discover_soundpacks` can recover.
    pub fn from_settings(
        registry: Arc<SoundpackRegistry>,
        player: Arc<dyn AudioPlayer>,
        settings: &Settings,
    ) -> Self {
        let mut scheduler = ChimeScheduler::new(registry, player)
            .with_intervals(settings.intervals())
            .with_volume(settings.volume);
        scheduler.set_quiet_hours(settings.quiet_hours());

        let service = Self::new(scheduler);
        service.select_initial(&settings.soundpack);
        service
    }

    /// Discovers packs, then switches to `preferred` or, failing that, to the
    /// first discovered pack that loads.
    pub fn select_initial(&self, preferred: &str) -> Option<Arc<Soundpack>> {
        let names = match self.registry.discover() {
            Ok(names) => names,
            Err(e) => {
                tracing::error!(error = %e, "soundpack discovery failed");
                return None;
            }
        };

        match self.registry.switch_to(preferred) {
            Ok(pack) => return Some(pack),
            Err(e) => {
                tracing::warn!(
                    soundpack = preferred,
                    error = %e.message,
                    "selected soundpack unavailable"
                );
            }
        }

        let fallback = names
            .iter()
            .filter(|name| name.as_str() != preferred)
            .find_map(|name| self.registry.switch_to(name).ok());
        if fallback.is_none() {
            tracing::warn!(root = %self.registry.root().display(), "no loadable soundpack found");
        }
        fallback
    }

    /// Rescans the soundpack root.
    pub fn discover_soundpacks(&self) -> Result<Vec<String>> {
        self.registry.discover()
    }

    /// Makes `name` the active soundpack. A failure leaves the active pack unchanged.
    pub fn switch_soundpack(&self, name: &str) -> Result<Arc<Soundpack>> {
        self.registry.switch_to(name)
    }

    pub fn current_soundpack(&self) -> Option<Arc<Soundpack>> {
        self.registry.current()
    }

    pub fn registry(&self) -> &Arc<SoundpackRegistry> {
        &self.registry
    }

    /// Plays `chime` from the active pack once, outside the schedule.
    ///
    /// Returns the played path, or None when no pack is active or the pack
    /// lacks this chime. Does not affect chime deduplication.
    pub fn trigger_test_chime(&self, chime: ChimeType) -> Result<Option<PathBuf>> {
        let Some(pack) = self.registry.current() else {
            return Ok(None);
        };
        let Some(path) = pack.get_chime_path(chime) else {
            return Ok(None);
        };

        let volume = self.scheduler.lock().volume();
        self.player.play(path, volume)?;
        tracing::info!(
            %chime,
            soundpack = pack.name(),
            path = %path.display(),
            "test chime played"
        );
        Ok(Some(path.to_path_buf()))
    }

    /// Runs one scheduler tick against the wall clock.
    pub fn tick(&self) -> TickOutcome {
        self.scheduler.lock().tick()
    }

    /// Runs one scheduler tick at an explicit time.
    pub fn tick_at(&self, now: WallTime) -> TickOutcome {
        self.scheduler.lock().tick_at(now)
    }

    pub fn intervals(&self) -> IntervalSwitches {
        self.scheduler.lock().intervals()
    }

    pub fn set_intervals(&self, intervals: IntervalSwitches) {
        self.scheduler.lock().set_intervals(intervals);
    }

    pub fn volume(&self) -> u8 {
        self.scheduler.lock().volume()
    }

    pub fn set_volume(&self, volume_percent: u8) {
        self.scheduler.lock().set_volume(volume_percent);
    }

    pub fn quiet_hours(&self) -> Option<QuietHours> {
        self.scheduler.lock().quiet_hours()
    }

    pub fn set_quiet_hours(&self, quiet_hours: Option<QuietHours>) {
        self.scheduler.lock().set_quiet_hours(quiet_hours);
    }

    /// Returns a snapshot of the current state.
    pub fn status(&self) -> ServiceStatus {
        let pack = self.registry.current();
        let scheduler = self.scheduler.lock();
        ServiceStatus {
            soundpack: pack.as_ref().map(|p| p.name().to_string()),
            display_name: pack.as_ref().map(|p| p.display_name().to_string()),
            chimes: pack.as_ref().map(|p| p.available_chimes()).unwrap_or_default(),
            intervals: scheduler.intervals(),
            volume: scheduler.volume(),
            quiet_hours: scheduler.quiet_hours(),
            last_fired: scheduler.last_fired(),
        }
    }
}
