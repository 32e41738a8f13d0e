//! The portable formatted document.
//!
//! This is the complete persisted/exported state of an editor: an ordered list
//! of blocks, each with plain text, an alignment, and a sparse multiset of
//! `(index, style)` pairs. It deliberately knows nothing about what a style
//! string means; recognizing tags is the style registry's job.
//!
//! ```json
//! { "alignment": "left",
//!   "blocks": [
//!     { "text": "Hi", "alignment": "left",
//!       "styles": [ { "index": 0, "style": "BOLD" } ] } ] }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::Alignment;

/// Errors decoding or encoding the wire form.
#[derive(Error, Debug)]
pub enum WireError {
    /// Malformed JSON or a shape that does not match the document schema.
    #[error("invalid formatted document: {0}")]
    Json(#[from] serde_json::Error),
}

/// One active style at one position.
///
/// `index` is signed so that malformed producers (negative offsets) decode
/// instead of failing the whole document; the codec skips such entries.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StyleEntry {
    /// Zero-based UTF-16 code-unit offset into the block text.
    ///
    /// Numbers that are not an `i64` (fractions, exponents, values past
    /// `i64::MAX`) decode as [`StyleEntry::INVALID_INDEX`].
    #[serde(deserialize_with = "lenient_index")]
    pub index: i64,
    /// Style tag string, e.g. `BOLD`, `COLOR_#FF0000`, `FONTSIZE_12`.
    pub style: String,
}

impl StyleEntry {
    /// Index recorded for a number that cannot address any position.
    pub const INVALID_INDEX: i64 = i64::MIN;

    pub fn new(index: i64, style: impl Into<String>) -> Self {
        Self {
            index,
            style: style.into(),
        }
    }
}

fn lenient_index<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    Ok(number.as_i64().unwrap_or(StyleEntry::INVALID_INDEX))
}

/// A block on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireBlock {
    /// Plain text, verbatim.
    pub text: String,
    /// Block alignment. Older producers omit it; readers fall back to the
    /// document-level alignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    /// Sparse `(index, style)` multiset. Order carries no meaning.
    #[serde(default)]
    pub styles: Vec<StyleEntry>,
}

impl WireBlock {
    /// Create an unstyled block.
    pub fn new(text: impl Into<String>, alignment: Alignment) -> Self {
        Self {
            text: text.into(),
            alignment: Some(alignment),
            styles: Vec::new(),
        }
    }

    /// Builder-style helper adding one style entry.
    pub fn with_style(mut self, index: i64, style: impl Into<String>) -> Self {
        self.styles.push(StyleEntry::new(index, style));
        self
    }

    /// Text length in UTF-16 code units (the unit `index` counts in).
    pub fn len_utf16(&self) -> usize {
        self.text.encode_utf16().count()
    }

    /// Styles active at `index`, in entry order.
    pub fn styles_at(&self, index: usize) -> impl Iterator<Item = &str> {
        self.styles
            .iter()
            .filter(move |s| s.index == index as i64)
            .map(|s| s.style.as_str())
    }
}

/// The portable formatted document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedDocument {
    /// Document-level default. Derived from the first block on export; never
    /// independent state.
    #[serde(default)]
    pub alignment: Alignment,
    /// Blocks in document order.
    #[serde(default)]
    pub blocks: Vec<WireBlock>,
}

impl FormattedDocument {
    pub fn new(alignment: Alignment, blocks: Vec<WireBlock>) -> Self {
        Self { alignment, blocks }
    }

    /// Decode from JSON.
    pub fn from_json(json: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode as compact JSON.
    pub fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Concatenated text of all blocks, newline separated.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Canonical form: styles sorted per block and exact duplicates removed.
    ///
    /// Two documents that differ only in `styles` ordering normalize equal.
    pub fn normalized(&self) -> Self {
        let blocks = self
            .blocks
            .iter()
            .map(|b| {
                let mut styles = b.styles.clone();
                styles.sort();
                styles.dedup();
                WireBlock {
                    text: b.text.clone(),
                    alignment: b.alignment,
                    styles,
                }
            })
            .collect();
        Self {
            alignment: self.alignment,
            blocks,
        }
    }
}
