//! Style tags and per-character tag sets.
//!
//! A [`StyleTag`] is an atomic formatting marker on one character. Tags fall
//! into three [`Category`] families:
//!
//! - **Toggle** (`BOLD`, `ITALIC`, `UNDERLINE`): independent on/off flags.
//! - **Color** (`COLOR_#RRGGBB`): mutually exclusive per character.
//! - **Size** (`FONTSIZE_<n>`): mutually exclusive per character.
//!
//! Parsing here is purely syntactic. Whether a tag is *recognized* (e.g. a
//! size on the ladder) is decided by the [`StyleRegistry`](crate::StyleRegistry).

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

const COLOR_PREFIX: &str = "COLOR_";
const FONTSIZE_PREFIX: &str = "FONTSIZE_";

/// A six-digit hex color, normalized to `#RRGGBB` uppercase.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Parse a user-supplied color, tolerating a missing `#` and lowercase
    /// digits (as color pickers produce).
    pub fn parse(s: &str) -> Option<Self> {
        let digits = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(format!("#{}", digits.to_ascii_uppercase())))
    }

    pub(crate) fn black() -> Self {
        Self("#000000".to_string())
    }

    /// Canonical `#RRGGBB` form used in tag strings.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form used as a rendered color value.
    pub fn to_css(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HexColor({})", self.0)
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        HexColor::parse(&value).ok_or(value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

/// Style family, deciding how a tag combines with others on a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Independently on/off.
    Toggle,
    /// At most one per character.
    Color,
    /// At most one per character.
    Size,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Toggle => "toggle",
            Category::Color => "color",
            Category::Size => "size",
        }
    }

    /// Whether at most one tag of this category may be active per character.
    pub fn is_exclusive(&self) -> bool {
        !matches!(self, Category::Toggle)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A formatting marker applicable to one character position.
///
/// Ordering is derived, which gives exports a stable enumeration order:
/// toggles first, then color, then size.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleTag {
    Bold,
    Italic,
    Underline,
    Color(HexColor),
    FontSize(u16),
}

impl StyleTag {
    /// Parse a wire tag string.
    ///
    /// Only the canonical spelling is accepted (`BOLD`, `COLOR_#FF0000`,
    /// `FONTSIZE_12`), so a parsed tag always prints back to the exact input.
    pub fn parse(s: &str) -> Option<Self> {
        let tag = match s {
            "BOLD" => StyleTag::Bold,
            "ITALIC" => StyleTag::Italic,
            "UNDERLINE" => StyleTag::Underline,
            _ => {
                if let Some(hex) = s.strip_prefix(COLOR_PREFIX) {
                    StyleTag::Color(HexColor::parse(hex)?)
                } else if let Some(size) = s.strip_prefix(FONTSIZE_PREFIX) {
                    StyleTag::FontSize(parse_size(size)?)
                } else {
                    return None;
                }
            }
        };
        (tag.to_string() == s).then_some(tag)
    }

    /// Category classification.
    pub fn category(&self) -> Category {
        match self {
            StyleTag::Bold | StyleTag::Italic | StyleTag::Underline => Category::Toggle,
            StyleTag::Color(_) => Category::Color,
            StyleTag::FontSize(_) => Category::Size,
        }
    }

    /// Color tag from a user-supplied hex string.
    pub fn color(hex: &str) -> Option<Self> {
        HexColor::parse(hex).map(StyleTag::Color)
    }
}

/// Digits only, no sign, no leading zeros.
fn parse_size(s: &str) -> Option<u16> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) || (s.len() > 1 && s.starts_with('0'))
    {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleTag::Bold => f.write_str("BOLD"),
            StyleTag::Italic => f.write_str("ITALIC"),
            StyleTag::Underline => f.write_str("UNDERLINE"),
            StyleTag::Color(hex) => write!(f, "{COLOR_PREFIX}{hex}"),
            StyleTag::FontSize(size) => write!(f, "{FONTSIZE_PREFIX}{size}"),
        }
    }
}

/// The set of tags active on one character.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleSet(BTreeSet<StyleTag>);

impl StyleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, tag: &StyleTag) -> bool {
        self.0.contains(tag)
    }

    pub fn insert(&mut self, tag: StyleTag) -> bool {
        self.0.insert(tag)
    }

    pub fn remove(&mut self, tag: &StyleTag) -> bool {
        self.0.remove(tag)
    }

    /// Flip `tag`: remove it if present, add it otherwise.
    pub fn toggle(&mut self, tag: &StyleTag) {
        if !self.0.remove(tag) {
            self.0.insert(tag.clone());
        }
    }

    /// Drop every tag of `category`.
    pub fn clear_category(&mut self, category: Category) {
        self.0.retain(|t| t.category() != category);
    }

    /// Tags of one category.
    pub fn of_category(&self, category: Category) -> impl Iterator<Item = &StyleTag> {
        self.0.iter().filter(move |t| t.category() == category)
    }

    /// Keep only tags also present in `other`.
    pub fn retain_common(&mut self, other: &StyleSet) {
        self.0.retain(|t| other.contains(t));
    }

    /// Whether the color/size exclusivity invariant holds.
    pub fn is_consistent(&self) -> bool {
        self.of_category(Category::Color).count() <= 1
            && self.of_category(Category::Size).count() <= 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleTag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<StyleTag> for StyleSet {
    fn from_iter<I: IntoIterator<Item = StyleTag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a StyleSet {
    type Item = &'a StyleTag;
    type IntoIter = std::collections::btree_set::Iter<'a, StyleTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_normalizes() {
        assert_eq!(HexColor::parse("#ff6666").unwrap().as_str(), "#FF6666");
        assert_eq!(HexColor::parse("00ff00").unwrap().as_str(), "#00FF00");
        assert_eq!(HexColor::parse("#FF6666").unwrap().to_css(), "#ff6666");
    }

    #[test]
    fn test_hex_color_rejects_bad_input() {
        assert!(HexColor::parse("").is_none());
        assert!(HexColor::parse("#fff").is_none());
        assert!(HexColor::parse("#GG0000").is_none());
        assert!(HexColor::parse("#FF00000").is_none());
    }

    #[test]
    fn test_parse_wire_tags() {
        assert_eq!(StyleTag::parse("BOLD"), Some(StyleTag::Bold));
        assert_eq!(StyleTag::parse("ITALIC"), Some(StyleTag::Italic));
        assert_eq!(StyleTag::parse("UNDERLINE"), Some(StyleTag::Underline));
        assert_eq!(
            StyleTag::parse("COLOR_#FF0000"),
            Some(StyleTag::Color(HexColor::parse("#FF0000").unwrap()))
        );
        assert_eq!(StyleTag::parse("FONTSIZE_12"), Some(StyleTag::FontSize(12)));
    }

    #[test]
    fn test_parse_rejects_non_canonical() {
        assert_eq!(StyleTag::parse("bold"), None);
        assert_eq!(StyleTag::parse("COLOR_#ff0000"), None);
        assert_eq!(StyleTag::parse("COLOR_FF0000"), None);
        assert_eq!(StyleTag::parse("FONTSIZE_012"), None);
        assert_eq!(StyleTag::parse("FONTSIZE_+12"), None);
        assert_eq!(StyleTag::parse("FONTSIZE_"), None);
        assert_eq!(StyleTag::parse("STRIKETHROUGH"), None);
    }

    #[test]
    fn test_display_roundtrips_parse() {
        for s in ["BOLD", "ITALIC", "UNDERLINE", "COLOR_#E6E6FA", "FONTSIZE_72"] {
            assert_eq!(StyleTag::parse(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_category() {
        assert_eq!(StyleTag::Bold.category(), Category::Toggle);
        assert_eq!(StyleTag::color("#000000").unwrap().category(), Category::Color);
        assert_eq!(StyleTag::FontSize(8).category(), Category::Size);
        assert!(!Category::Toggle.is_exclusive());
        assert!(Category::Color.is_exclusive());
        assert!(Category::Size.is_exclusive());
    }

    #[test]
    fn test_style_set_toggle() {
        let mut set = StyleSet::new();
        set.toggle(&StyleTag::Bold);
        assert!(set.contains(&StyleTag::Bold));
        set.toggle(&StyleTag::Bold);
        assert!(set.is_empty());
    }

    #[test]
    fn test_style_set_clear_category() {
        let mut set: StyleSet = [
            StyleTag::Bold,
            StyleTag::color("#000000").unwrap(),
            StyleTag::FontSize(12),
        ]
        .into_iter()
        .collect();
        set.clear_category(Category::Color);
        assert_eq!(set.len(), 2);
        assert_eq!(set.of_category(Category::Color).count(), 0);
        assert!(set.contains(&StyleTag::Bold));
    }

    #[test]
    fn test_style_set_consistency() {
        let mut set: StyleSet = [StyleTag::color("#000000").unwrap()].into_iter().collect();
        assert!(set.is_consistent());
        set.insert(StyleTag::color("#FF0000").unwrap());
        assert!(!set.is_consistent());
    }

    #[test]
    fn test_style_set_order_is_stable() {
        let set: StyleSet = [
            StyleTag::FontSize(12),
            StyleTag::Underline,
            StyleTag::color("#000000").unwrap(),
            StyleTag::Bold,
        ]
        .into_iter()
        .collect();
        let names: Vec<String> = set.iter().map(|t| t.to_string()).collect();
        assert_eq!(names, ["BOLD", "UNDERLINE", "COLOR_#000000", "FONTSIZE_12"]);
    }
}
