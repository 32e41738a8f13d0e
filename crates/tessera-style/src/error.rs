//! Error types for style operations.
//!
//! None of these are fatal. The session layer turns every one of them into a
//! logged no-op; they exist so direct callers of the engine can tell *why* a
//! request was refused.

use thiserror::Error;

use crate::config::ConfigError;
use crate::content::BlockKey;
use crate::tag::{Category, StyleTag};

/// Errors that can occur during style operations.
#[derive(Error, Debug)]
pub enum StyleError {
    /// Tag is syntactically valid but not in the registry (e.g. a size off
    /// the ladder), or the string is not a tag at all.
    #[error("unknown style tag: {0}")]
    UnknownTag(String),

    /// Tag used with an operation for a different category, e.g. toggling a
    /// color or exclusively setting `BOLD`.
    #[error("style {tag} is not a {expected} style")]
    CategoryMismatch { tag: StyleTag, expected: Category },

    /// Exclusive set requested for a category without exclusivity.
    #[error("category {0} is not exclusive")]
    NotExclusive(Category),

    /// Color string is not a six-digit hex value.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// Block not found in the current snapshot.
    #[error("block not found: {0}")]
    BlockNotFound(BlockKey),

    /// Invalid editor configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
