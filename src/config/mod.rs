// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! The configuration is organized into logical sections:
//! - `[general]` - Language and theme mode
//! - `[playback]` - Load timeout, polling cadence, startup and audio settings
//! - `[overlay]` - Playback controls auto-hide timeout
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Pass `--config-dir` on the command line
//! 3. Set `M3U8_PLAYER_CONFIG_DIR` environment variable
//! 4. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use m3u8_player::config::{self, Config};
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! // Modify a setting
//! config.playback.load_timeout_secs = Some(30);
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::error::{Error, Result};
use crate::ui::theming::ThemeMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "zh-CN").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Application theme mode (light, dark, or system).
    #[serde(
        default = "default_theme_mode",
        deserialize_with = "deserialize_theme_mode"
    )]
    pub theme_mode: ThemeMode,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: None,
            theme_mode: default_theme_mode(),
        }
    }
}

/// Playback attempt and stream settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaybackConfig {
    /// Seconds an attempt may stay unresolved before it is cancelled.
    #[serde(
        default = "default_load_timeout_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub load_timeout_secs: Option<u32>,

    /// Status polling cadence in milliseconds.
    #[serde(
        default = "default_poll_interval_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub poll_interval_ms: Option<u32>,

    /// Delay between revealing the player and starting playback.
    #[serde(
        default = "default_autoplay_delay_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub autoplay_delay_ms: Option<u32>,

    /// Seconds to wait for a first frame before re-issuing play once.
    #[serde(
        default = "default_startup_retry_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub startup_retry_secs: Option<u32>,

    /// How far decoded audio may run ahead of the clock, in seconds.
    #[serde(
        default = "default_forward_buffer_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub forward_buffer_secs: Option<f64>,

    /// Playback volume (0.0 to 1.5).
    #[serde(default = "default_volume", skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,

    /// Whether audio is muted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            load_timeout_secs: default_load_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            autoplay_delay_ms: default_autoplay_delay_ms(),
            startup_retry_secs: default_startup_retry_secs(),
            forward_buffer_secs: default_forward_buffer_secs(),
            volume: default_volume(),
            muted: Some(false),
        }
    }
}

/// Playback controls overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayConfig {
    /// Auto-hide timeout for playback controls (seconds).
    #[serde(
        default = "default_overlay_timeout_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout_secs: Option<u32>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_overlay_timeout_secs(),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Playback settings.
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Overlay settings.
    #[serde(default)]
    pub overlay: OverlayConfig,
}

/// Resolved timings and audio preferences, with every value clamped into range.
///
/// This is what the rest of the application consumes; the raw [`Config`]
/// keeps `Option`s so that absent keys are not written back on save.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSettings {
    pub load_timeout: Duration,
    pub poll_interval: Duration,
    pub autoplay_delay: Duration,
    pub startup_retry: Duration,
    pub forward_buffer: Duration,
    pub overlay_timeout: Duration,
    pub volume: f32,
    pub muted: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl PlaybackSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let playback = &config.playback;
        let load_timeout_secs = playback
            .load_timeout_secs
            .unwrap_or(DEFAULT_LOAD_TIMEOUT_SECS)
            .clamp(MIN_LOAD_TIMEOUT_SECS, MAX_LOAD_TIMEOUT_SECS);
        let poll_interval_ms = playback
            .poll_interval_ms
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS)
            .clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS);
        let forward_buffer_secs = playback
            .forward_buffer_secs
            .filter(|secs| secs.is_finite())
            .unwrap_or(DEFAULT_FORWARD_BUFFER_SECS)
            .clamp(MIN_FORWARD_BUFFER_SECS, MAX_FORWARD_BUFFER_SECS);
        let overlay_secs = config
            .overlay
            .timeout_secs
            .unwrap_or(DEFAULT_OVERLAY_TIMEOUT_SECS)
            .clamp(MIN_OVERLAY_TIMEOUT_SECS, MAX_OVERLAY_TIMEOUT_SECS);

        Self {
            load_timeout: Duration::from_secs(u64::from(load_timeout_secs)),
            poll_interval: Duration::from_millis(u64::from(poll_interval_ms)),
            autoplay_delay: Duration::from_millis(u64::from(
                playback
                    .autoplay_delay_ms
                    .unwrap_or(DEFAULT_AUTOPLAY_DELAY_MS),
            )),
            startup_retry: Duration::from_secs(u64::from(
                playback
                    .startup_retry_secs
                    .unwrap_or(DEFAULT_STARTUP_RETRY_SECS),
            )),
            forward_buffer: Duration::from_secs_f64(forward_buffer_secs),
            overlay_timeout: Duration::from_secs(u64::from(overlay_secs)),
            volume: playback
                .volume
                .filter(|volume| volume.is_finite())
                .unwrap_or(DEFAULT_VOLUME)
                .clamp(MIN_VOLUME, MAX_VOLUME),
            muted: playback.muted.unwrap_or(false),
        }
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_theme_mode() -> ThemeMode {
    ThemeMode::System
}

fn default_load_timeout_secs() -> Option<u32> {
    Some(DEFAULT_LOAD_TIMEOUT_SECS)
}

fn default_poll_interval_ms() -> Option<u32> {
    Some(DEFAULT_POLL_INTERVAL_MS)
}

fn default_autoplay_delay_ms() -> Option<u32> {
    Some(DEFAULT_AUTOPLAY_DELAY_MS)
}

fn default_startup_retry_secs() -> Option<u32> {
    Some(DEFAULT_STARTUP_RETRY_SECS)
}

fn default_forward_buffer_secs() -> Option<f64> {
    Some(DEFAULT_FORWARD_BUFFER_SECS)
}

fn default_volume() -> Option<f32> {
    Some(DEFAULT_VOLUME)
}

fn default_overlay_timeout_secs() -> Option<u32> {
    Some(DEFAULT_OVERLAY_TIMEOUT_SECS)
}

fn deserialize_theme_mode<'de, D>(deserializer: D) -> std::result::Result<ThemeMode, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let raw = String::deserialize(deserializer)?;
    match raw.to_lowercase().as_str() {
        "light" => Ok(ThemeMode::Light),
        "dark" => Ok(ThemeMode::Dark),
        "system" => Ok(ThemeMode::System),
        other => Err(D::Error::custom(format!("invalid theme_mode: {}", other))),
    }
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config file path with an optional override.
fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with an i18n key describing what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    log::warn!("Ignoring unreadable config {}: {}", path.display(), err);
                    return (
                        Config::default(),
                        Some("warning-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
