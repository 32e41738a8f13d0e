//! Style registry: the closed catalog of recognized tags and their effects.
//!
//! Built once from an [`EditorConfig`] and shared read-only. The color family
//! is open (any valid hex is a legal tag, swatches are just the standard
//! picks); the size family is closed to the configured ladder.

use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, EditorConfig};
use crate::tag::{Category, HexColor, StyleSet, StyleTag};

static STANDARD: LazyLock<Arc<StyleRegistry>> =
    LazyLock::new(|| Arc::new(StyleRegistry::builtin()));

/// Direction of a one-rung font-size step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeStep {
    Increase,
    Decrease,
}

/// Merged visual effect of a tag set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderEffect {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    /// Lowercase `#rrggbb`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u16>,
}

fn is_false(v: &bool) -> bool {
    !v
}

impl RenderEffect {
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// CSS declaration list, e.g. `font-weight: bold; color: #ff0000`.
    pub fn to_css(&self) -> String {
        let mut decls = Vec::new();
        if self.bold {
            decls.push("font-weight: bold".to_string());
        }
        if self.italic {
            decls.push("font-style: italic".to_string());
        }
        if self.underline {
            decls.push("text-decoration: underline".to_string());
        }
        if let Some(color) = &self.color {
            decls.push(format!("color: {color}"));
        }
        if let Some(size) = self.font_size {
            decls.push(format!("font-size: {size}px"));
        }
        decls.join("; ")
    }
}

/// Catalog of recognized style tags.
#[derive(Clone, Debug)]
pub struct StyleRegistry {
    palette: Vec<HexColor>,
    font_sizes: Vec<u16>,
    default_font_size: u16,
    default_color: HexColor,
}

impl StyleRegistry {
    /// Build from a config, validating it first.
    pub fn from_config(config: &EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let parse = |s: &String| HexColor::parse(s).ok_or_else(|| ConfigError::InvalidColor(s.clone()));
        Ok(Self {
            palette: config.palette.iter().map(parse).collect::<Result<_, _>>()?,
            font_sizes: config.font_sizes.clone(),
            default_font_size: config.default_font_size,
            default_color: parse(&config.default_color)?,
        })
    }

    /// The registry for the built-in palette and ladder.
    fn builtin() -> Self {
        let config = EditorConfig::default();
        Self {
            palette: config.palette.iter().filter_map(|s| HexColor::parse(s)).collect(),
            font_sizes: config.font_sizes,
            default_font_size: config.default_font_size,
            default_color: HexColor::parse(&config.default_color).unwrap_or_else(HexColor::black),
        }
    }

    /// Process-wide registry for the default config, built on first use.
    pub fn standard() -> Arc<StyleRegistry> {
        Arc::clone(&STANDARD)
    }

    pub fn palette(&self) -> &[HexColor] {
        &self.palette
    }

    pub fn font_sizes(&self) -> &[u16] {
        &self.font_sizes
    }

    pub fn default_font_size(&self) -> u16 {
        self.default_font_size
    }

    pub fn default_color(&self) -> &HexColor {
        &self.default_color
    }

    /// Category classification.
    pub fn category(&self, tag: &StyleTag) -> Category {
        tag.category()
    }

    /// Whether `tag` is a recognized style.
    pub fn contains(&self, tag: &StyleTag) -> bool {
        match tag {
            StyleTag::Bold | StyleTag::Italic | StyleTag::Underline | StyleTag::Color(_) => true,
            StyleTag::FontSize(size) => self.font_sizes.contains(size),
        }
    }

    /// Whether `color` is one of the standard swatches.
    pub fn is_swatch(&self, color: &HexColor) -> bool {
        self.palette.contains(color)
    }

    /// Parse a wire style string, accepting only recognized tags.
    pub fn resolve(&self, style: &str) -> Option<StyleTag> {
        StyleTag::parse(style).filter(|tag| self.contains(tag))
    }

    /// Next rung on the size ladder from `current`.
    ///
    /// Sizes off the ladder step to the nearest rung in the given direction.
    /// Returns `None` at either end.
    pub fn step_font_size(&self, current: u16, step: SizeStep) -> Option<u16> {
        match step {
            SizeStep::Increase => self.font_sizes.iter().copied().find(|&s| s > current),
            SizeStep::Decrease => self.font_sizes.iter().rev().copied().find(|&s| s < current),
        }
    }

    /// Merge the effects of every tag in `tags`.
    ///
    /// Exclusivity is enforced when styles are applied, so a second color or
    /// size here means inconsistent data: it is logged and the later tag wins.
    pub fn resolve_effect(&self, tags: &StyleSet) -> RenderEffect {
        let mut effect = RenderEffect::default();
        for tag in tags {
            match tag {
                StyleTag::Bold => effect.bold = true,
                StyleTag::Italic => effect.italic = true,
                StyleTag::Underline => effect.underline = true,
                StyleTag::Color(hex) => {
                    if let Some(prev) = effect.color.replace(hex.to_css()) {
                        tracing::warn!(previous = %prev, winner = %hex, "multiple color tags on one character");
                    }
                }
                StyleTag::FontSize(size) => {
                    if let Some(prev) = effect.font_size.replace(*size) {
                        tracing::warn!(previous = prev, winner = size, "multiple size tags on one character");
                    }
                }
            }
        }
        effect
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
