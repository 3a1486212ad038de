use crate::engine::DEFAULT_SEARCH_ENGINE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Application configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub browser: BrowserConfig,
    pub ui: UiConfig,
    pub commands: CommandsConfig,
}

/// Main window configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial width (in pixels)
    pub width: f32,
    /// Initial height (in pixels)
    pub height: f32,
    pub show_menu_bar: bool,
}

/// Browsing behaviour
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BrowserConfig {
    /// Opened when the browser starts without arguments; empty for none
    pub home_page: String,
    /// Search URL template, `{}` is replaced by the query
    pub search_engine: String,
    /// Pixels scrolled by scroll-up and scroll-down
    pub scroll_step: f32,
}

/// UI behavior configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Seconds before warnings and messages disappear
    pub status_timeout_secs: u64,
    /// Size of the main interface font (in points)
    pub font_size: f32,
}

/// Where the command table comes from
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct CommandsConfig {
    /// `.toml` or `.json` file; the built-in table is used when unset
    pub path: Option<PathBuf>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
            show_menu_bar: true,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            home_page: String::new(),
            search_engine: DEFAULT_SEARCH_ENGINE.to_string(),
            scroll_step: 40.0,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            status_timeout_secs: 4,
            font_size: 14.0,
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "kiri")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Config::default(),
        }
    }

    /// Load configuration from `path`, or return defaults if it is missing
    /// or broken
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Config::default();
        }
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to parse config file, using defaults");
                    Config::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read config file, using defaults");
                Config::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Create a default config file if it doesn't exist
    pub fn create_default() -> Result<(), Box<dyn std::error::Error>> {
        if let Some(path) = Self::config_path() {
            Self::create_default_at(&path)?;
        }
        Ok(())
    }

    /// Write the defaults to `path` unless a file is already there.
    /// Returns whether a file was written.
    pub fn create_default_at(path: &Path) -> Result<bool, Box<dyn std::error::Error>> {
        if path.exists() {
            return Ok(false);
        }
        Config::default().save_to(path)?;
        debug!(path = %path.display(), "wrote default config");
        Ok(true)
    }
}
