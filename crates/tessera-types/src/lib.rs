//! Wire types for Tessera formatted documents.
//!
//! This crate is the portable side of the style model: the JSON-compatible
//! [`FormattedDocument`] that editors save and load. It has **no internal
//! tessera dependencies** and no notion of which style strings are legal.
//! That lives in `tessera-style`, which owns the dense per-character model
//! and the codec between the two.
//!
//! # Key Types
//!
//! |-----------------------|------------------------------------------------|
//! | Type                  | Purpose                                        |
//! |-----------------------|------------------------------------------------|
//! | [`FormattedDocument`] | Blocks plus a derived document-level alignment |
//! | [`WireBlock`]         | Text, alignment, sparse `(index, style)` pairs |
//! | [`StyleEntry`]        | One active style string at one code-unit index |
//! | [`Alignment`]         | left / center / right / justify                |
//! |-----------------------|------------------------------------------------|

pub mod alignment;
pub mod document;

pub use alignment::Alignment;
pub use document::{FormattedDocument, StyleEntry, WireBlock, WireError};
