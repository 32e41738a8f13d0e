//! Editor configuration: color palette, font-size ladder, toolbar defaults.
//!
//! Stored as RON. Every field has a default, so a partial file such as
//!
//! ```ron
//! (
//!     font_sizes: [10, 12, 14],
//!     default_font_size: 12,
//! )
//! ```
//!
//! only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tag::HexColor;

/// Standard swatch palette, in grid order.
pub const STANDARD_SWATCHES: [&str; 24] = [
    "#000000", "#888888", "#CCCCCC", "#FFFFFF", "#FF0000", "#FF6666", "#FFA500", "#FFFF00",
    "#00FF00", "#00FFFF", "#0000FF", "#800080", "#FFC0CB", "#808000", "#800000", "#008080",
    "#808080", "#C0C0C0", "#FFD700", "#008000", "#000080", "#FF00FF", "#E6E6FA", "#FF1493",
];

/// Font-size ladder in points.
pub const FONT_SIZES: [u16; 13] = [8, 10, 12, 14, 16, 18, 20, 24, 28, 32, 36, 48, 72];

/// Toolbar font size before any size has been applied.
pub const DEFAULT_FONT_SIZE: u16 = 12;

/// Toolbar color before any color has been applied.
pub const DEFAULT_COLOR: &str = "#000000";

/// Error type for config loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid palette color {0:?}")]
    InvalidColor(String),
    #[error("font size ladder is empty")]
    EmptyLadder,
    #[error("font size ladder must be strictly ascending and non-zero")]
    UnorderedLadder,
    #[error("default font size {0} is not on the ladder")]
    DefaultSizeNotOnLadder(u16),
}

/// Palette and size ladder the style registry is built from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Standard swatches. Custom hex colors are always accepted on top.
    pub palette: Vec<String>,
    /// Closed set of legal font sizes, ascending.
    pub font_sizes: Vec<u16>,
    pub default_font_size: u16,
    pub default_color: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            palette: STANDARD_SWATCHES.iter().map(|s| s.to_string()).collect(),
            font_sizes: FONT_SIZES.to_vec(),
            default_font_size: DEFAULT_FONT_SIZE,
            default_color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a RON document.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_ron_str(&text)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            swatches = config.palette.len(),
            sizes = config.font_sizes.len(),
            "loaded editor config"
        );
        Ok(config)
    }

    /// Check palette syntax and ladder shape.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for color in self.palette.iter().chain(std::iter::once(&self.default_color)) {
            if HexColor::parse(color).is_none() {
                return Err(ConfigError::InvalidColor(color.clone()));
            }
        }
        if self.font_sizes.is_empty() {
            return Err(ConfigError::EmptyLadder);
        }
        if self.font_sizes[0] == 0 || self.font_sizes.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::UnorderedLadder);
        }
        if !self.font_sizes.contains(&self.default_font_size) {
            return Err(ConfigError::DefaultSizeNotOnLadder(self.default_font_size));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.palette.len(), 24);
        assert_eq!(config.font_sizes.first(), Some(&8));
        assert_eq!(config.font_sizes.last(), Some(&72));
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = EditorConfig::from_ron_str("(font_sizes: [10, 12, 14])").unwrap();
        assert_eq!(config.font_sizes, vec![10, 12, 14]);
        assert_eq!(config.default_font_size, 12);
        assert_eq!(config.palette.len(), 24);
    }

    #[test]
    fn test_rejects_bad_palette() {
        let err = EditorConfig::from_ron_str(r##"(palette: ["#000000", "blue"])"##).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidColor(c) if c == "blue"));
    }

    #[test]
    fn test_rejects_unordered_ladder() {
        let err = EditorConfig::from_ron_str("(font_sizes: [12, 10])").unwrap_err();
        assert!(matches!(err, ConfigError::UnorderedLadder));
        let err = EditorConfig::from_ron_str("(font_sizes: [])").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyLadder));
    }

    #[test]
    fn test_rejects_default_size_off_ladder() {
        let err = EditorConfig::from_ron_str("(font_sizes: [10, 14])").unwrap_err();
        assert!(matches!(err, ConfigError::DefaultSizeNotOnLadder(12)));
    }

    #[test]
    fn test_rejects_malformed_ron() {
        let err = EditorConfig::from_ron_str("(font_sizes: [").unwrap_err();
        assert!(matches!(err, ConfigError::Ron(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r##"(palette: ["#112233"], font_sizes: [9, 11], default_font_size: 11, default_color: "#112233")"##
        )
        .unwrap();
        let config = EditorConfig::load(file.path()).unwrap();
        assert_eq!(config.palette, vec!["#112233".to_string()]);
        assert_eq!(config.default_font_size, 11);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EditorConfig::load(dir.path().join("missing.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
