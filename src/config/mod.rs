// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, loading and saving
//! user preferences to a `settings.toml` file.
//!
//! The file is split into `[playback]`, `[display]` and `[logging]` sections.
//! Missing keys take their defaults; a file that does not parse is replaced
//! by the defaults and reported as a warning instead of an error.
//!
//! # Examples
//!
//! ```no_run
//! use iced_review::config::{self, Config};
//!
//! let (mut config, warning) = config::load();
//! if let Some(warning) = warning {
//!     eprintln!("{warning}");
//! }
//!
//! config.playback.initial_zoom = 1.0;
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

use crate::app::paths;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use defaults::*;

const CONFIG_FILE: &str = "settings.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub playback: PlaybackConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Canvas scale applied when a video is opened.
    pub initial_zoom: f32,
    /// Second jumps offered as buttons.
    pub jump_steps_secs: Vec<f64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            initial_zoom: DEFAULT_INITIAL_ZOOM,
            jump_steps_secs: DEFAULT_JUMP_STEPS_SECS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub zoom_animation_ms: u64,
    pub zoom_update_interval_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            zoom_animation_ms: DEFAULT_ZOOM_ANIMATION_MS,
            zoom_update_interval_ms: DEFAULT_ZOOM_UPDATE_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `iced_review=debug`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Initial zoom, clamped to the viewport's scale range.
    pub fn initial_zoom(&self) -> f32 {
        let zoom = self.playback.initial_zoom;
        if zoom.is_finite() && zoom > 0.0 {
            zoom.clamp(crate::ui::viewport::MIN_SCALE, crate::ui::viewport::MAX_SCALE)
        } else {
            DEFAULT_INITIAL_ZOOM
        }
    }

    /// Usable jump steps; falls back to the defaults if none survive.
    pub fn jump_steps(&self) -> Vec<f64> {
        let steps: Vec<f64> = self
            .playback
            .jump_steps_secs
            .iter()
            .copied()
            .filter(|secs| secs.is_finite() && *secs != 0.0 && secs.abs() <= MAX_JUMP_STEP_SECS)
            .collect();
        if steps.is_empty() {
            DEFAULT_JUMP_STEPS_SECS.to_vec()
        } else {
            steps
        }
    }

    pub fn zoom_animation(&self) -> Duration {
        Duration::from_millis(
            self.display
                .zoom_animation_ms
                .clamp(MIN_ZOOM_TIMING_MS, MAX_ZOOM_TIMING_MS),
        )
    }

    pub fn zoom_update_interval(&self) -> Duration {
        Duration::from_millis(
            self.display
                .zoom_update_interval_ms
                .clamp(MIN_ZOOM_TIMING_MS, MAX_ZOOM_TIMING_MS),
        )
    }
}

/// Path of `settings.toml` in the resolved config directory.
pub fn config_file_path() -> Option<PathBuf> {
    paths::config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Loads the config from the resolved config directory.
///
/// Never fails: a missing file gives the defaults, an unreadable or invalid
/// one gives the defaults plus a warning describing what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Like [`load`], reading from `config_dir` when given.
pub fn load_with_override(config_dir: Option<PathBuf>) -> (Config, Option<String>) {
    let Some(path) = paths::config_dir_with_override(config_dir).map(|dir| dir.join(CONFIG_FILE))
    else {
        return (Config::default(), None);
    };
    if !path.exists() {
        return (Config::default(), None);
    }

    match load_from_path(&path) {
        Ok(config) => (config, None),
        Err(err) => (
            Config::default(),
            Some(format!(
                "Ignoring {} and using defaults: {err}",
                path.display()
            )),
        ),
    }
}

pub fn save(config: &Config) -> Result<()> {
    match config_file_path() {
        Some(path) => save_to_path(config, &path),
        None => Err(Error::Config("no config directory available".into())),
    }
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
