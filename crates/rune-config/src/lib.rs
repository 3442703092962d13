//! Rune Lines configuration system
//!
//! This crate provides centralized configuration for the line layout core,
//! loading policy settings from `rune-lines.toml` with environment variable
//! overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "rune-lines.toml";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure for the line layout core
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LinesConfig {
    /// Justification settings
    pub justify: JustifyConfig,
    /// Cursor placement and motion settings
    pub cursor: CursorConfig,
}

/// Pixel-grid rounding applied to justification adjustments.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Hinting {
    /// Round only when the width to distribute is a whole number of pixels.
    #[default]
    Auto,
    /// Always round adjustments to whole pixels.
    Always,
    /// Never round; distribute exact layout units.
    Never,
}

impl Hinting {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }
}

/// Justification configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JustifyConfig {
    /// Rounding policy for distributed space
    pub hinting: Hinting,
    /// Spread space between all clusters when a line has no expandable spaces
    pub letter_spacing_fallback: bool,
}

/// Cursor configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CursorConfig {
    /// Count a paragraph break as one extra visual position during motion
    pub paragraph_boundary_step: bool,
    /// Report the last position of a wrapped line as leading, not trailing
    pub suppress_wrapped_trailing: bool,
}

impl Default for JustifyConfig {
    fn default() -> Self {
        Self {
            hinting: Hinting::Auto,
            letter_spacing_fallback: true,
        }
    }
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            paragraph_boundary_step: true,
            suppress_wrapped_trailing: true,
        }
    }
}

fn parse_bool(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl LinesConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from the default location (rune-lines.toml in the
    /// current directory) or return default configuration if it is missing
    /// or malformed
    pub fn load_or_default() -> Self {
        Self::load_from_file(CONFIG_FILE).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("RUNE_LINES_HINTING") {
            if let Some(hinting) = Hinting::parse(&val) {
                self.justify.hinting = hinting;
            }
        }
        if let Ok(val) = std::env::var("RUNE_LINES_LETTER_SPACING_FALLBACK") {
            self.justify.letter_spacing_fallback = parse_bool(&val);
        }
        if let Ok(val) = std::env::var("RUNE_LINES_PARAGRAPH_STEP") {
            self.cursor.paragraph_boundary_step = parse_bool(&val);
        }
        if let Ok(val) = std::env::var("RUNE_LINES_SUPPRESS_WRAPPED_TRAILING") {
            self.cursor.suppress_wrapped_trailing = parse_bool(&val);
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from rune-lines.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
