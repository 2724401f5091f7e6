use crate::error::{Error, Result};
use crate::parser::ExtractOptions;
use crate::tracker::TrackerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracker: TrackerSection,

    #[serde(default)]
    pub extract: ExtractSection,

    #[serde(default)]
    pub ui: UiConfig,
}

/// Active-section tracking constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSection {
    /// Distance below the viewport top at which a heading becomes active,
    /// in the host's layout units (pixels in a browser, see `ui.row_height`
    /// for the terminal)
    #[serde(default = "default_scroll_offset")]
    pub scroll_offset: f64,

    /// Delay before the first position scan after a document is shown
    #[serde(default = "default_mount_delay_ms")]
    pub mount_delay_ms: u64,
}

impl Default for TrackerSection {
    fn default() -> Self {
        Self {
            scroll_offset: default_scroll_offset(),
            mount_delay_ms: default_mount_delay_ms(),
        }
    }
}

fn default_scroll_offset() -> f64 {
    120.0
}

fn default_mount_delay_ms() -> u64 {
    200
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractSection {
    /// Ignore `#` lines inside fenced code blocks (default: true)
    #[serde(default = "default_skip_code_fences")]
    pub skip_code_fences: bool,
}

impl Default for ExtractSection {
    fn default() -> Self {
        Self {
            skip_code_fences: default_skip_code_fences(),
        }
    }
}

fn default_skip_code_fences() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Outline pane width as a percentage of the terminal
    #[serde(default = "default_outline_width")]
    pub outline_width: u16,

    /// Layout units per terminal row; maps rows onto `tracker.scroll_offset`
    #[serde(default = "default_row_height")]
    pub row_height: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            outline_width: default_outline_width(),
            row_height: default_row_height(),
        }
    }
}

fn default_outline_width() -> u16 {
    30
}

fn default_row_height() -> f64 {
    40.0
}

/// Keep the outline pane between 10% and 90% of the terminal width
pub fn clamp_outline_width(width: u16) -> u16 {
    width.clamp(10, 90)
}

impl Config {
    /// Get the platform-specific config file path
    /// - macOS: ~/Library/Application Support/tocnav/config.toml
    /// - Linux: ~/.config/tocnav/config.toml
    /// - Windows: %APPDATA%/tocnav/config.toml
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tocnav").join("config.toml"))
    }

    /// Load config from the default location, or return defaults if the file
    /// is missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring config file");
                Self::default()
            }
        }
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ConfigNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::Io(e),
        })?;

        let mut config: Self = toml::from_str(&contents).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.ui.outline_width = clamp_outline_width(config.ui.outline_width);
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or(Error::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Update outline width and save config
    pub fn set_outline_width(&mut self, width: u16) -> Result<()> {
        self.ui.outline_width = clamp_outline_width(width);
        self.save()
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            scroll_offset: self.tracker.scroll_offset,
            mount_delay: Duration::from_millis(self.tracker.mount_delay_ms),
        }
    }

    /// Tracker constants converted to terminal rows.
    ///
    /// The terminal view measures anchors in rows, so the offset is divided
    /// by `ui.row_height`.
    pub fn terminal_tracker_config(&self) -> TrackerConfig {
        let row_height = if self.ui.row_height > 0.0 {
            self.ui.row_height
        } else {
            default_row_height()
        };
        TrackerConfig {
            scroll_offset: (self.tracker.scroll_offset / row_height).floor(),
            ..self.tracker_config()
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            skip_code_fences: self.extract.skip_code_fences,
        }
    }
}
