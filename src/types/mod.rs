//! Core types for the chime-daemon.
//!
//! This module re-exports all the core data types used throughout the daemon:
//! - [`ChimeType`]: The logical chimes a soundpack provides
//! - [`WallTime`]: A local time at minute precision
//! - [`QuietHours`]: A daily window during which chimes are suppressed

mod chime;
mod time;

// Re-export all types at the module level
pub use chime::ChimeType;
pub use time::{QuietHours, WallTime};
