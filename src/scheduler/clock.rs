//! Wall-clock sources for the scheduler.

use std::sync::Arc;

use chrono::{Local, Timelike};
use parking_lot::Mutex;

use crate::types::WallTime;

/// Source of the current local wall-clock time.
pub trait Clock: Send {
    fn now(&self) -> WallTime;
}

/// Reads the system's local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> WallTime {
        let now = Local::now();
        WallTime {
            hour: now.hour() as u8,
            minute: now.minute() as u8,
        }
    }
}

/// A clock whose time is set by hand. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    time: Arc<Mutex<WallTime>>,
}

impl ManualClock {
    pub fn new(time: WallTime) -> Self {
        Self {
            time: Arc::new(Mutex::new(time)),
        }
    }

    pub fn set(&self, time: WallTime) {
        *self.time.lock() = time;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> WallTime {
        *self.time.lock()
    }
}
