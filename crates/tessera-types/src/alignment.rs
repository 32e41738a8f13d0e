//! Block alignment.
//!
//! Alignment is block-scoped metadata, not a character style. Every block
//! carries exactly one value; blocks that predate the attribute read as
//! [`Alignment::Left`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

/// Horizontal alignment of a block.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// All values in toolbar order.
    pub const ALL: [Alignment; 4] = [
        Alignment::Left,
        Alignment::Center,
        Alignment::Right,
        Alignment::Justify,
    ];

    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Convert to wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }

    /// Block style class the display side keys on, e.g. `ALIGN_CENTER`.
    pub fn css_class(&self) -> String {
        format!("ALIGN_{}", self.as_str().to_ascii_uppercase())
    }
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_left() {
        assert_eq!(Alignment::default(), Alignment::Left);
    }

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!(Alignment::from_str("center"), Some(Alignment::Center));
        assert_eq!(Alignment::from_str("RIGHT"), Some(Alignment::Right));
        assert_eq!(Alignment::from_str("Justify"), Some(Alignment::Justify));
        assert_eq!(Alignment::from_str("middle"), None);
    }

    #[test]
    fn test_as_str_matches_serde() {
        for alignment in Alignment::ALL {
            let json = serde_json::to_string(&alignment).unwrap();
            assert_eq!(json, format!("\"{}\"", alignment.as_str()));
            let back: Alignment = serde_json::from_str(&json).unwrap();
            assert_eq!(back, alignment);
        }
    }

    #[test]
    fn test_css_class() {
        assert_eq!(Alignment::Left.css_class(), "ALIGN_LEFT");
        assert_eq!(Alignment::Justify.css_class(), "ALIGN_JUSTIFY");
    }
}
