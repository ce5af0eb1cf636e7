//! Wall-clock types used by the scheduler.
//!
//! The scheduler only cares about minute granularity, so times are kept
//! as (hour, minute) pairs rather than full timestamps.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A local wall-clock time at minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WallTime {
    /// Hour of the day (0-23).
    pub hour: u8,
    /// Minute of the hour (0-59).
    pub minute: u8,
}

impl WallTime {
    /// Creates a WallTime, returning None when out of range.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Parses a `HH:MM` string (24-hour clock).
    pub fn parse(s: &str) -> Option<Self> {
        let (hour, minute) = s.trim().split_once(':')?;
        Self::new(hour.parse().ok()?, minute.parse().ok()?)
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for WallTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WallTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        WallTime::parse(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid time '{}', expected HH:MM", s))
        })
    }
}

/// A daily window during which chimes are suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    /// First silent minute.
    pub start: WallTime,
    /// First audible minute after the window.
    pub end: WallTime,
}

impl QuietHours {
    /// Creates a quiet window from `start` (inclusive) to `end` (exclusive).
    pub fn new(start: WallTime, end: WallTime) -> Self {
        Self { start, end }
    }

    /// Returns true if `time` falls inside the window.
    ///
    /// A window whose start is after its end spans midnight.
    pub fn contains(&self, time: WallTime) -> bool {
        if self.start > self.end {
            time >= self.start || time < self.end
        } else {
            self.start <= time && time < self.end
        }
    }
}
