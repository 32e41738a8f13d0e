//! Character-level style model for Tessera.
//!
//! Every character of every text block carries a set of style tags. The tags
//! come from a closed registry and fall into categories that decide how they
//! combine: toggles are independent, colors and sizes are exclusive per
//! character.
//!
//! # Components
//!
//! | Module       | Role                                                       |
//! |--------------|------------------------------------------------------------|
//! | `tag`        | `StyleTag`, `Category`, `StyleSet`                         |
//! | `registry`   | Recognized tags, font-size ladder, render effects          |
//! | `content`    | Immutable block snapshots with dense per-character styles  |
//! | `engine`     | Toggle / exclusive-set / active-set over a selection       |
//! | `alignment`  | Block alignment, anchor-block rule for selections          |
//! | `codec`      | `FormattedDocument` import and export                      |
//! | `session`    | Editor snapshots, toolbar state, command dispatch          |
//! | `config`     | Palette and size ladder, loadable from RON                 |
//!
//! # Snapshots
//!
//! Mutations never modify a [`ContentState`] in place. Each returns a new
//! snapshot that shares unchanged blocks with the old one, so a caller can
//! keep any number of earlier states around.

pub mod alignment;
pub mod codec;
pub mod config;
mod content;
mod engine;
mod error;
mod registry;
mod selection;
pub mod session;
mod tag;

pub use codec::{ImportReport, SkipReason, SkippedEntry, export, import, import_with_report};
pub use config::{ConfigError, EditorConfig};
pub use content::{BlockKey, ContentState, StyledBlock};
pub use engine::StyleEngine;
pub use error::StyleError;
pub use registry::{RenderEffect, SizeStep, StyleRegistry};
pub use selection::{Position, ResolvedSelection, Selection, Span};
pub use session::{Command, EditorSession, EditorState, ToolbarView};
pub use tag::{Category, HexColor, StyleSet, StyleTag};

pub use tessera_types::{Alignment, FormattedDocument, StyleEntry, WireBlock};

/// Result type for style operations.
pub type Result<T> = std::result::Result<T, StyleError>;
