//! Tick-driven chime decision engine.
//!
//! Each tick maps the current wall-clock minute to at most one chime and
//! dispatches it to the audio player. The only state carried between ticks
//! is `last_fired`, which guarantees at most one dispatch per (hour, minute).

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use crate::audio::{clamp_volume, AudioPlayer, DEFAULT_VOLUME};
use crate::soundpack::SoundpackRegistry;
use crate::types::{ChimeType, QuietHours, WallTime};

/// Which chime intervals are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSwitches {
    pub hourly: bool,
    pub half: bool,
    pub quarter: bool,
}

impl IntervalSwitches {
    /// Returns true if `chime` is enabled.
    pub fn is_enabled(&self, chime: ChimeType) -> bool {
        match chime {
            ChimeType::Hour => self.hourly,
            ChimeType::Half => self.half,
            ChimeType::Quarter => self.quarter,
        }
    }
}

impl Default for IntervalSwitches {
    /// Hourly only.
    fn default() -> Self {
        Self {
            hourly: true,
            half: false,
            quarter: false,
        }
    }
}

/// What a single tick decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TickOutcome {
    /// No chime is due this minute.
    Idle,
    /// A chime is due but its interval is switched off.
    Disabled { chime: ChimeType },
    /// A chime is due but falls within quiet hours.
    Quiet { chime: ChimeType },
    /// This minute was already evaluated.
    AlreadyEvaluated,
    /// No soundpack has been loaded yet.
    NoSoundpack { chime: ChimeType },
    /// The active soundpack lacks this chime.
    Unavailable { chime: ChimeType, soundpack: String },
    /// The chime was handed to the audio player.
    Dispatched {
        chime: ChimeType,
        time: WallTime,
        path: PathBuf,
    },
    /// The audio player rejected the chime.
    Failed { chime: ChimeType, reason: String },
}

/// Maps wall-clock time to chime dispatches.
///
/// Ticks must be delivered serially; `tick` takes `&mut self`, so a host
/// sharing the scheduler across threads has to serialize access anyway.
pub struct ChimeScheduler {
    registry: Arc<SoundpackRegistry>,
    player: Arc<dyn AudioPlayer>,
    clock: Box<dyn Clock>,
    intervals: IntervalSwitches,
    volume: u8,
    quiet_hours: Option<QuietHours>,
    last_fired: Option<WallTime>,
}

impl ChimeScheduler {
    /// Creates a scheduler reading the system clock, hourly chimes only.
    pub fn new(registry: Arc<SoundpackRegistry>, player: Arc<dyn AudioPlayer>) -> Self {
        Self {
            registry,
            player,
            clock: Box::new(SystemClock),
            intervals: IntervalSwitches::default(),
            volume: DEFAULT_VOLUME,
            quiet_hours: None,
            last_fired: None,
        }
    }

    /// Replaces the clock source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_intervals(mut self, intervals: IntervalSwitches) -> Self {
        self.intervals = intervals;
        self
    }

    pub fn with_volume(mut self, volume_percent: u8) -> Self {
        self.set_volume(volume_percent);
        self
    }

    /// Evaluates the current wall-clock minute.
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.clock.now();
        self.tick_at(now)
    }

    /// Evaluates `now`. Never fails: playback errors are logged and reported
    /// in the outcome.
    pub fn tick_at(&mut self, now: WallTime) -> TickOutcome {
        let Some(chime) = ChimeType::for_minute(now.minute) else {
            return TickOutcome::Idle;
        };

        if !self.intervals.is_enabled(chime) {
            return TickOutcome::Disabled { chime };
        }

        if self.quiet_hours.is_some_and(|q| q.contains(now)) {
            return TickOutcome::Quiet { chime };
        }

        if self.last_fired == Some(now) {
            return TickOutcome::AlreadyEvaluated;
        }
        self.last_fired = Some(now);

        let Some(pack) = self.registry.current() else {
            tracing::debug!(%chime, time = %now, "chime due but no soundpack loaded");
            return TickOutcome::NoSoundpack { chime };
        };

        let Some(path) = pack.get_chime_path(chime) else {
            tracing::debug!(%chime, soundpack = pack.name(), "soundpack has no such chime");
            return TickOutcome::Unavailable {
                chime,
                soundpack: pack.name().to_string(),
            };
        };

        match self.player.play(path, self.volume) {
            Ok(()) => {
                tracing::info!(
                    %chime,
                    time = %now,
                    soundpack = pack.name(),
                    path = %path.display(),
                    volume = self.volume,
                    "chime dispatched"
                );
                TickOutcome::Dispatched {
                    chime,
                    time: now,
                    path: path.to_path_buf(),
                }
            }
            Err(e) => {
                tracing::error!(%chime, time = %now, error = %e, "chime playback failed");
                TickOutcome::Failed {
                    chime,
                    reason: e.message,
                }
            }
        }
    }

    pub fn intervals(&self) -> IntervalSwitches {
        self.intervals
    }

    pub fn set_intervals(&mut self, intervals: IntervalSwitches) {
        self.intervals = intervals;
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Sets the volume, clamped to 0-100.
    pub fn set_volume(&mut self, volume_percent: u8) {
        self.volume = clamp_volume(i64::from(volume_percent));
    }

    pub fn quiet_hours(&self) -> Option<QuietHours> {
        self.quiet_hours
    }

    /// Sets or clears the quiet window.
    pub fn set_quiet_hours(&mut self, quiet_hours: Option<QuietHours>) {
        self.quiet_hours = quiet_hours;
    }

    /// The most recently evaluated chime minute.
    pub fn last_fired(&self) -> Option<WallTime> {
        self.last_fired
    }

    /// Forgets the last evaluated minute.
    pub fn reset(&mut self) {
        self.last_fired = None;
    }

    pub fn registry(&self) -> &Arc<SoundpackRegistry> {
        &self.registry
    }

    pub fn player(&self) -> &Arc<dyn AudioPlayer> {
        &self.player
    }
}
