//! chime-daemon: interval chimes played from swappable soundpacks.
//!
//! This library provides the core functionality for the chime-daemon, which
//! plays an hour, half-hour, or quarter-hour chime from the active soundpack
//! whenever the wall clock reaches one of those marks.
//!
//! # Modules
//!
//! - [`soundpack`]: Soundpack validation, loading, and the registry
//! - [`scheduler`]: Tick-driven chime decisions (ChimeScheduler, Ticker)
//! - [`audio`]: Playback collaborator (AudioPlayer and implementations)
//! - [`service`]: UI-facing facade over registry and scheduler
//! - [`rpc`]: JSON-RPC 2.0 control surface over stdio
//! - [`config`], [`settings`]: Runtime configuration and persisted user settings
//! - [`error`]: Error types and codes (ChimeError, ErrorCode)
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chime_daemon::{
//!     audio::DryRunPlayer, ChimeService, Settings, SoundpackRegistry, WallTime,
//! };
//!
//! let registry = Arc::new(SoundpackRegistry::new("/usr/share/chimes"));
//! let player = Arc::new(DryRunPlayer);
//! let service = ChimeService::from_settings(registry, player, &Settings::default());
//!
//! // Top of the hour: plays the active pack's hour chime once.
//! let outcome = service.tick_at(WallTime::new(9, 0).unwrap());
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod rpc;
pub mod scheduler;
pub mod service;
pub mod settings;
pub mod soundpack;
pub mod types;

// Re-export commonly used types at crate root for convenience
pub use config::DaemonConfig;
pub use error::{ChimeError, ErrorCode, Result};
pub use scheduler::{ChimeScheduler, IntervalSwitches, TickOutcome};
pub use service::{ChimeService, ServiceStatus};
pub use settings::Settings;
pub use soundpack::{Soundpack, SoundpackRegistry};
pub use types::{ChimeType, QuietHours, WallTime};
