//! Application configuration.
//!
//! The configuration is loaded from
//! `$XDG_CONFIG_HOME/swipeswitch/config.json`.  Every field is optional and
//! a missing file means "all defaults".  The swipe threshold is a compiled
//! constant ([`SWIPE_THRESHOLD`](crate::gesture::SWIPE_THRESHOLD)) and
//! cannot be set here.
//!
//! # Example
//!
//! ```json
//! {
//!   "compositor": "sway",
//!   "input": {
//!     "seat": "seat0",
//!     "device": "/dev/input/event7"
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which compositor to send workspace commands to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositorKind {
    /// sway if `$SWAYSOCK` is set, Hyprland if
    /// `$HYPRLAND_INSTANCE_SIGNATURE` is set, sway otherwise.
    #[default]
    Auto,
    Sway,
    Hyprland,
}

impl CompositorKind {
    /// Resolve [`Auto`](CompositorKind::Auto) from the environment.
    pub fn resolve(self) -> CompositorKind {
        self.resolve_with(|name| std::env::var_os(name).is_some_and(|v| !v.is_empty()))
    }

    /// Resolve against an arbitrary "is this variable set" predicate.
    fn resolve_with(self, is_set: impl Fn(&str) -> bool) -> CompositorKind {
        match self {
            CompositorKind::Auto if is_set("SWAYSOCK") => CompositorKind::Sway,
            CompositorKind::Auto if is_set("HYPRLAND_INSTANCE_SIGNATURE") => {
                CompositorKind::Hyprland
            }
            CompositorKind::Auto => CompositorKind::Sway,
            other => other,
        }
    }
}

/// Touchpad input settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// udev seat whose devices are watched.  Default: `"seat0"`.
    pub seat: String,
    /// Watch only this evdev node instead of the whole seat.
    pub device: Option<PathBuf>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            seat: "seat0".into(),
            device: None,
        }
    }
}

/// Top-level configuration.
///
/// A minimal `{}` file is valid; all sections fall back to their
/// compiled-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Target compositor.
    #[serde(default)]
    pub compositor: CompositorKind,

    /// Touchpad input settings.
    #[serde(default)]
    pub input: InputConfig,
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A file that does not exist is reported as [`ConfigError::NotFound`]
    /// so callers can tell "no config" apart from "broken config".
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Read(format!("failed to read {}: {}", path.display(), e)),
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            ConfigError::Parse(format!("failed to parse {}: {}", path.display(), e))
        })?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config file at {}", .0.display())]
    NotFound(PathBuf),
    #[error("config error: {0}")]
    Read(String),
    #[error("config error: {0}")]
    Parse(String),
}
