//! chime-daemon: interval chimes from swappable soundpacks.
//!
//! This binary can run in several modes:
//! - One-shot: list soundpacks or play a single chime
//! - Watch mode: tick in the foreground and play chimes as they come due
//! - Daemon mode: ticking plus a JSON-RPC server for a UI host

use std::sync::Arc;

use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;

use chime_daemon::audio::{AudioPlayer, DryRunPlayer};
use chime_daemon::cli::Cli;
use chime_daemon::config::DaemonConfig;
use chime_daemon::rpc::{run_server, tick_and_notify, Notifier, ServerState};
use chime_daemon::scheduler::Ticker;
use chime_daemon::service::ChimeService;
use chime_daemon::settings::{load_settings, Settings};
use chime_daemon::soundpack::SoundpackRegistry;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    if !cli.is_daemon_mode() && !cli.is_watch_mode() && !cli.is_oneshot_mode() {
        print_usage();
        return Ok(());
    }

    let mut config = DaemonConfig::from_env();
    cli.apply_to_config(&mut config);
    if let Some(problem) = config.validate() {
        bail!("invalid configuration: {}", problem);
    }

    let settings_path = config.effective_settings_path();
    let mut settings = load_settings(&settings_path);
    cli.apply_to_settings(&mut settings);

    let soundpacks_path = config.effective_soundpacks_path();
    tracing::info!(
        soundpacks = %soundpacks_path.display(),
        settings = %settings_path.display(),
        "starting chime-daemon"
    );

    let player = build_player(cli.dry_run)?;
    let registry = Arc::new(SoundpackRegistry::new(soundpacks_path));
    let service = Arc::new(ChimeService::from_settings(registry, player, &settings));

    if cli.is_daemon_mode() {
        run_daemon_mode(&config, service, settings, settings_path)
    } else if cli.is_watch_mode() {
        run_watch_mode(&config, service);
        Ok(())
    } else {
        run_oneshot_mode(&cli, &service)
    }
}

/// Sends all logs to stderr; stdout is reserved for JSON-RPC.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Picks the audio output. Uses the device when playback support is
/// compiled in, unless a dry run was requested.
fn build_player(dry_run: bool) -> anyhow::Result<Arc<dyn AudioPlayer>> {
    #[cfg(feature = "playback")]
    if !dry_run {
        let player = chime_daemon::audio::DevicePlayer::new()
            .context("failed to open the audio output device")?;
        return Ok(Arc::new(player));
    }

    #[cfg(not(feature = "playback"))]
    if !dry_run {
        tracing::warn!("built without the playback feature; chimes will only be logged");
    }

    Ok(Arc::new(DryRunPlayer))
}

/// Lists soundpacks or plays a single chime.
fn run_oneshot_mode(cli: &Cli, service: &ChimeService) -> anyhow::Result<()> {
    if cli.list {
        let names = service
            .discover_soundpacks()
            .context("failed to list soundpacks")?;
        let current = service.current_soundpack();
        for name in names {
            let marker = match current {
                Some(ref pack) if pack.name() == name => "*",
                _ => " ",
            };
            println!("{} {}", marker, name);
        }
    }

    if let Some(chime) = cli.test {
        let Some(pack) = service.current_soundpack() else {
            bail!("no soundpack available under {}", service.registry().root().display());
        };
        match service.trigger_test_chime(chime)? {
            Some(path) => println!("{} chime: {}", chime, path.display()),
            None => bail!("soundpack '{}' has no {} chime", pack.name(), chime),
        }
    }

    Ok(())
}

/// Ticks in the foreground until the process is killed.
fn run_watch_mode(config: &DaemonConfig, service: Arc<ChimeService>) {
    tracing::info!(period_ms = config.tick_ms, "watching the clock");
    let ticker = Ticker::spawn(config.tick_period(), move || {
        service.tick();
    });
    ticker.join();
}

/// Runs the daemon mode (ticker plus JSON-RPC server).
fn run_daemon_mode(
    config: &DaemonConfig,
    service: Arc<ChimeService>,
    settings: Settings,
    settings_path: std::path::PathBuf,
) -> anyhow::Result<()> {
    let notifier = Notifier::stdout();
    let tick_service = Arc::clone(&service);
    let tick_notifier = notifier.clone();
    let mut ticker = Ticker::spawn(config.tick_period(), move || {
        tick_and_notify(&tick_service, &tick_notifier);
    });

    let state = ServerState::new(service, settings, Some(settings_path)).with_notifier(notifier);
    let result = run_server(state);

    ticker.shutdown();
    result.context("JSON-RPC server failed")
}

/// Prints usage information.
fn print_usage() {
    eprintln!("chime-daemon: interval chimes from swappable soundpacks");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  List soundpacks (* marks the active one):");
    eprintln!("    chime-daemon --list");
    eprintln!();
    eprintln!("  Play one chime from a soundpack:");
    eprintln!("    chime-daemon --soundpack classic --test quarter");
    eprintln!();
    eprintln!("  Tick in the foreground:");
    eprintln!("    chime-daemon --watch --volume 40");
    eprintln!();
    eprintln!("  Daemon mode (ticking plus JSON-RPC server):");
    eprintln!("    chime-daemon --daemon");
    eprintln!();
    eprintln!("Run 'chime-daemon --help' for full options.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_usage_doesnt_panic() {
        print_usage();
    }

    #[test]
    fn dry_run_player_is_always_available() {
        assert!(build_player(true).is_ok());
    }
}
