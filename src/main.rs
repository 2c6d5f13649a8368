//! Entry point for the **swipeswitch** daemon.
//!
//! Connects to the compositor, opens the touchpad and runs the event loop on
//! the main thread until SIGINT / SIGTERM.  Startup failures are logged and
//! exit with status 1.
//!
//! `--dry-run` skips the compositor entirely and only logs what would have
//! been sent, which is handy for checking a touchpad.

use log::{error, info, warn};
use std::error::Error;
use swipeswitch::config::{CompositorKind, Config, ConfigError};
use swipeswitch::daemon;
use swipeswitch::hyprland::compositor::HyprlandCompositor;
use swipeswitch::sway::SwayCompositor;
use swipeswitch::touchpad::Touchpad;
use swipeswitch::traits::Compositor;

/// Resolve the config directory (`$XDG_CONFIG_HOME/swipeswitch`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("swipeswitch")
}

/// Try to load the config from `$XDG_CONFIG_HOME/swipeswitch/config.json`.
///
/// A missing file means defaults.  A file that exists but cannot be read or
/// parsed is reported loudly before falling back.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e @ ConfigError::NotFound(_)) => {
            info!("{}, using defaults", e);
            Config::default()
        }
        Err(e) => {
            warn!("{}; ignoring it and using defaults", e);
            Config::default()
        }
    }
}

//  Dry-run compositor (--dry-run)

mod dry_run {
    use log::info;
    use swipeswitch::command::CompositorCommand;
    use swipeswitch::traits::Compositor;

    pub struct LogCompositor;

    #[derive(Debug, thiserror::Error)]
    #[error("dry run")]
    pub struct LogCompositorError;

    impl Compositor for LogCompositor {
        type Error = LogCompositorError;

        fn name(&self) -> &'static str {
            "dry-run"
        }

        fn send(&mut self, command: CompositorCommand) -> Result<(), LogCompositorError> {
            info!("dry run: would switch to {}", command);
            Ok(())
        }
    }
}

use dry_run::LogCompositor;

//  Main

fn main() {
    env_logger::init();

    let dry_run = std::env::args().any(|a| a == "--dry-run");
    let config = load_config();

    let result = if dry_run {
        info!("running in dry-run mode (no workspace switching)");
        run_with(&config, LogCompositor)
    } else {
        run_daemon(&config)
    };

    // Everything opened above has been dropped by now.
    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Connect to the configured compositor and run.
fn run_daemon(config: &Config) -> Result<(), Box<dyn Error>> {
    match config.compositor.resolve() {
        CompositorKind::Hyprland => {
            let hyprland = HyprlandCompositor::open_default()
                .map_err(|e| format!("cannot reach Hyprland: {}", e))?;
            info!("using Hyprland at {}", hyprland.socket().display());
            run_with(config, hyprland)
        }
        CompositorKind::Sway | CompositorKind::Auto => {
            let mut sway = SwayCompositor::connect_default()
                .map_err(|e| format!("cannot reach sway: {}", e))?;
            let version = sway
                .version()
                .map_err(|e| format!("sway handshake failed: {}", e))?;
            info!("connected to sway {}", version);
            run_with(config, sway)
        }
    }
}

/// Open the touchpad and hand both ends to the event loop.
fn run_with<C: Compositor + 'static>(config: &Config, compositor: C) -> Result<(), Box<dyn Error>> {
    let touchpad =
        Touchpad::open(&config.input).map_err(|e| format!("cannot open touchpad: {}", e))?;
    daemon::run(touchpad, compositor)?;
    Ok(())
}
