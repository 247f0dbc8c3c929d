//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.parley/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::Platform;
use crate::core::input_method::CoordinatorConfig;
use crate::core::message::{Coordinate, Message, MessageEntry, MessageError};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub keyboard: KeyboardConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub toolbar: ToolbarConfig,
    /// Seed conversation. `None` means "use the built-in seed".
    pub messages: Option<Vec<MessageEntry>>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PlatformConfig {
    pub os: Option<Platform>,
    pub home_indicator: Option<bool>,
    pub layout_animations: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct KeyboardConfig {
    pub height: Option<u16>,
    pub animation_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LayoutConfig {
    pub fallback_custom_height: Option<u16>,
    pub home_indicator_inset: Option<u16>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ToolbarConfig {
    pub image_uri: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_KEYBOARD_HEIGHT: u16 = 8;
pub const DEFAULT_KEYBOARD_ANIMATION_MS: u64 = 250;
pub const DEFAULT_FALLBACK_CUSTOM_HEIGHT: u16 = 10;
pub const DEFAULT_HOME_INDICATOR_INSET: u16 = 1;
pub const DEFAULT_IMAGE_URI: &str = "https://unsplash.it/300/300";
pub const DEFAULT_LATITUDE: f64 = 37.78825;
pub const DEFAULT_LONGITUDE: f64 = -122.4324;

fn default_seed() -> Vec<MessageEntry> {
    vec![
        MessageEntry::image(DEFAULT_IMAGE_URI),
        MessageEntry::text("Hello World"),
        MessageEntry::location(DEFAULT_LATITUDE, DEFAULT_LONGITUDE),
    ]
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub platform: Platform,
    pub home_indicator: bool,
    pub layout_animations: bool,
    pub keyboard_height: u16,
    pub keyboard_animation_ms: u64,
    pub fallback_custom_height: u16,
    pub home_indicator_inset: u16,
    pub image_uri: String,
    pub location: Coordinate,
    pub seed_messages: Vec<Message>,
}

impl ResolvedConfig {
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            platform: self.platform,
            home_indicator: self.home_indicator,
            fallback_custom_height: f64::from(self.fallback_custom_height),
            home_indicator_inset: f64::from(self.home_indicator_inset),
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// A seed message or toolbar coordinate failed validation.
    Message(MessageError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Message(e) => write!(f, "config message error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<MessageError> for ConfigError {
    fn from(e: MessageError) -> Self {
        ConfigError::Message(e)
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.parley/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".parley").join("config.toml"))
}

/// Load config from `~/.parley/config.toml`, or from `explicit` if given.
///
/// If the default file doesn't exist, generates a commented-out default and
/// returns `ParleyConfig::default()`. An explicit path that doesn't exist is
/// an I/O error. A malformed file returns `ConfigError::Parse`.
pub fn load_config(explicit: Option<&Path>) -> Result<ParleyConfig, ConfigError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match config_path() {
            Some(p) => p,
            None => {
                warn!("Could not determine home directory, using default config");
                return Ok(ParleyConfig::default());
            }
        },
    };

    if explicit.is_none() && !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ParleyConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config = parse_config(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<ParleyConfig, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Parley Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [platform]
# os = "ios"                       # "ios" or "android" (or PARLEY_PLATFORM / --platform)
# home_indicator = false           # reserve an inset above the custom panel
# layout_animations = true         # animate height changes

# [keyboard]
# height = 8                       # rows taken by the on-screen keyboard
# animation_ms = 250

# [layout]
# fallback_custom_height = 10      # custom panel rows before keyboard height is known
# home_indicator_inset = 1

# [toolbar]
# image_uri = "https://unsplash.it/300/300"   # sent with Ctrl+P
# latitude = 37.78825                         # sent with Ctrl+L
# longitude = -122.4324

# [[messages]]
# type = "text"
# text = "Hello World"

# [[messages]]
# type = "location"
# latitude = 37.78825
# longitude = -122.4324
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_platform` comes from the `--platform` flag (None = not specified).
/// Seed messages are validated here; an unknown `type` aborts resolution.
pub fn resolve(config: &ParleyConfig, cli_platform: Option<Platform>) -> Result<ResolvedConfig, ConfigError> {
    // Platform: CLI → env → config → default
    let platform = cli_platform
        .or_else(|| {
            std::env::var("PARLEY_PLATFORM")
                .ok()
                .and_then(|s| parse_platform(&s))
        })
        .or(config.platform.os)
        .unwrap_or_default();

    let location = Coordinate::new(
        config.toolbar.latitude.unwrap_or(DEFAULT_LATITUDE),
        config.toolbar.longitude.unwrap_or(DEFAULT_LONGITUDE),
    )?;

    let entries = config.messages.clone().unwrap_or_else(default_seed);
    let seed_messages = entries
        .into_iter()
        .map(MessageEntry::into_message)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResolvedConfig {
        platform,
        home_indicator: config.platform.home_indicator.unwrap_or(false),
        layout_animations: config.platform.layout_animations.unwrap_or(true),
        keyboard_height: config.keyboard.height.unwrap_or(DEFAULT_KEYBOARD_HEIGHT),
        keyboard_animation_ms: config
            .keyboard
            .animation_ms
            .unwrap_or(DEFAULT_KEYBOARD_ANIMATION_MS),
        fallback_custom_height: config
            .layout
            .fallback_custom_height
            .unwrap_or(DEFAULT_FALLBACK_CUSTOM_HEIGHT),
        home_indicator_inset: config
            .layout
            .home_indicator_inset
            .unwrap_or(DEFAULT_HOME_INDICATOR_INSET),
        image_uri: config
            .toolbar
            .image_uri
            .clone()
            .unwrap_or_else(|| DEFAULT_IMAGE_URI.to_string()),
        location,
        seed_messages,
    })
}

fn parse_platform(value: &str) -> Option<Platform> {
    match value.trim().to_ascii_lowercase().as_str() {
        "ios" => Some(Platform::Ios),
        "android" => Some(Platform::Android),
        other => {
            warn!("Ignoring unknown PARLEY_PLATFORM value: {}", other);
            None
        }
    }
}
