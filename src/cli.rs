//! CLI argument parser.
//!
//! Provides the command-line interface for listing soundpacks, playing a
//! single chime, ticking in the foreground, or running the daemon.

use std::path::PathBuf;

use clap::Parser;

use crate::config::DaemonConfig;
use crate::settings::Settings;
use crate::types::ChimeType;

/// chime-daemon: interval chimes from swappable soundpacks
#[derive(Parser, Debug)]
#[command(name = "chime-daemon")]
#[command(about = "Plays hour, half-hour, and quarter-hour chimes from directory soundpacks")]
#[command(version)]
pub struct Cli {
    /// List discovered soundpacks and exit
    #[arg(short, long)]
    pub list: bool,

    /// Play one chime (hour, half, quarter) from the active soundpack and exit
    #[arg(short, long, value_name = "CHIME", value_parser = parse_chime)]
    pub test: Option<ChimeType>,

    /// Tick in the foreground, playing chimes as they come due
    #[arg(short, long)]
    pub watch: bool,

    /// Run in daemon mode (ticking plus JSON-RPC over stdio)
    #[arg(long)]
    pub daemon: bool,

    /// Directory containing one subdirectory per soundpack
    #[arg(long, value_name = "DIR")]
    pub soundpack_dir: Option<PathBuf>,

    /// Path to the settings JSON file
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Soundpack to select, overriding the saved setting
    #[arg(short, long, value_name = "NAME")]
    pub soundpack: Option<String>,

    /// Playback volume (0-100), overriding the saved setting
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: Option<u8>,

    /// Log playback instead of using the audio device
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_chime(value: &str) -> Result<ChimeType, String> {
    ChimeType::parse(value).ok_or_else(|| {
        format!("unknown chime '{}' (expected hour, half, or quarter)", value)
    })
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Returns true if running in daemon mode.
    pub fn is_daemon_mode(&self) -> bool {
        self.daemon
    }

    /// Returns true if running in foreground watch mode.
    pub fn is_watch_mode(&self) -> bool {
        !self.daemon && self.watch
    }

    /// Returns true if a one-shot command (list or test) was requested.
    pub fn is_oneshot_mode(&self) -> bool {
        !self.daemon && !self.watch && (self.list || self.test.is_some())
    }

    /// Applies path overrides on top of a config.
    pub fn apply_to_config(&self, config: &mut DaemonConfig) {
        if let Some(ref dir) = self.soundpack_dir {
            config.soundpacks_path = Some(dir.clone());
        }
        if let Some(ref path) = self.settings {
            config.settings_path = Some(path.clone());
        }
    }

    /// Applies soundpack and volume overrides on top of loaded settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref name) = self.soundpack {
            settings.soundpack = name.clone();
        }
        if let Some(volume) = self.volume {
            settings.volume = volume;
        }
    }
}
