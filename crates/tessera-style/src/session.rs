//! Editor session: snapshots, toolbar state, and the command surface.
//!
//! An [`EditorSession`] owns the current [`EditorState`] (content plus
//! selection) and the toolbar's remembered color and font size. Toolbar
//! buttons map to [`Command`]s; [`EditorSession::dispatch`] applies one and
//! replaces the state with the resulting snapshot.
//!
//! Rejected commands never reach the editing surface as failures: they are
//! logged at `warn` and leave the state as it was. Callers that need the
//! reason use [`EditorSession::try_dispatch`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tessera_types::{Alignment, FormattedDocument};

use crate::alignment;
use crate::codec::{self, ImportReport};
use crate::config::EditorConfig;
use crate::content::ContentState;
use crate::engine::StyleEngine;
use crate::registry::{SizeStep, StyleRegistry};
use crate::selection::{Position, Selection};
use crate::tag::{Category, HexColor, StyleSet, StyleTag};
use crate::{Result, StyleError};

/// One immutable editor snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorState {
    content: Arc<ContentState>,
    selection: Option<Selection>,
}

impl EditorState {
    /// Snapshot of `content` with the caret at its start.
    pub fn new(content: ContentState) -> Self {
        let selection = content.start_position().map(Selection::collapsed);
        Self {
            content: Arc::new(content),
            selection,
        }
    }

    pub fn content(&self) -> &ContentState {
        &self.content
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    fn with_content(&self, content: ContentState) -> Self {
        Self {
            content: Arc::new(content),
            selection: self.selection,
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(ContentState::with_empty_block())
    }
}

/// A toolbar action.
///
/// Serialized with a `command` tag so scripts can be stored as JSON, e.g.
/// `{"command": "set_color", "hex": "#FF0000"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, strum::AsRefStr)]
#[serde(tag = "command", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    SetColor { hex: String },
    SetFontSize { size: u16 },
    IncreaseFontSize,
    DecreaseFontSize,
    SetAlignment { alignment: Alignment },
    Select { anchor: Position, focus: Position },
    Save,
    Load { document: FormattedDocument },
}

/// What the toolbar shows for the current snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ToolbarView {
    /// Alignment of the anchor block.
    pub alignment: Alignment,
    /// Tags active across the whole selection, in wire spelling.
    pub active_styles: Vec<String>,
    pub current_color: String,
    pub current_font_size: u16,
    /// No block has text; the surface shows its placeholder.
    pub is_empty: bool,
}

/// A live editing session.
#[derive(Clone, Debug)]
pub struct EditorSession {
    registry: Arc<StyleRegistry>,
    state: EditorState,
    current_color: HexColor,
    current_font_size: u16,
}

impl EditorSession {
    /// Session over one empty block with the standard registry.
    pub fn new() -> Self {
        Self::with_registry(StyleRegistry::standard())
    }

    pub fn with_registry(registry: Arc<StyleRegistry>) -> Self {
        Self {
            current_color: registry.default_color().clone(),
            current_font_size: registry.default_font_size(),
            registry,
            state: EditorState::default(),
        }
    }

    /// Session with a registry built from `config`.
    pub fn with_config(config: &EditorConfig) -> Result<Self> {
        Ok(Self::with_registry(Arc::new(StyleRegistry::from_config(config)?)))
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn content(&self) -> &ContentState {
        self.state.content()
    }

    pub fn current_color(&self) -> &HexColor {
        &self.current_color
    }

    pub fn current_font_size(&self) -> u16 {
        self.current_font_size
    }

    /// Replace the document, putting the caret at its start.
    pub fn load(&mut self, doc: &FormattedDocument) -> ImportReport {
        let (content, report) = codec::import_with_report(doc, &self.registry);
        self.state = EditorState::new(content);
        report
    }

    /// Export the current document.
    pub fn save(&self) -> FormattedDocument {
        codec::export(self.content())
    }

    /// Move the selection. Fails if either end names an unknown block.
    pub fn select(&mut self, selection: Selection) -> Result<()> {
        for pos in [selection.anchor, selection.focus] {
            if self.content().block(pos.block).is_none() {
                return Err(StyleError::BlockNotFound(pos.block));
            }
        }
        self.state.selection = Some(selection);
        Ok(())
    }

    /// Apply a command, logging and dropping any rejection.
    ///
    /// Returns the exported document for [`Command::Save`].
    #[tracing::instrument(skip(self, command), fields(command = command.as_ref()), name = "session.dispatch")]
    pub fn dispatch(&mut self, command: Command) -> Option<FormattedDocument> {
        match self.try_dispatch(command) {
            Ok(out) => out,
            Err(e) => {
                tracing::warn!("command rejected: {e}");
                None
            }
        }
    }

    /// Apply a command, reporting why it was rejected.
    pub fn try_dispatch(&mut self, command: Command) -> Result<Option<FormattedDocument>> {
        tracing::trace!(command = command.as_ref(), "applying");
        match command {
            Command::ToggleBold => self.toggle(StyleTag::Bold)?,
            Command::ToggleItalic => self.toggle(StyleTag::Italic)?,
            Command::ToggleUnderline => self.toggle(StyleTag::Underline)?,
            Command::SetColor { hex } => self.set_color(&hex)?,
            Command::SetFontSize { size } => self.set_font_size(size)?,
            Command::IncreaseFontSize => self.step_font_size(SizeStep::Increase)?,
            Command::DecreaseFontSize => self.step_font_size(SizeStep::Decrease)?,
            Command::SetAlignment { alignment } => self.set_alignment(alignment),
            Command::Select { anchor, focus } => self.select(Selection::new(anchor, focus))?,
            Command::Save => return Ok(Some(self.save())),
            Command::Load { document } => {
                self.load(&document);
            }
        }
        Ok(None)
    }

    /// Tags active on every selected character.
    pub fn active_styles(&self) -> StyleSet {
        match self.state.selection {
            Some(sel) => self.engine().current_active_set(self.content(), &sel),
            None => StyleSet::new(),
        }
    }

    pub fn toolbar(&self) -> ToolbarView {
        let alignment = self
            .state
            .selection
            .map(|sel| alignment::selection_alignment(self.content(), &sel))
            .unwrap_or_default();
        ToolbarView {
            alignment,
            active_styles: self.active_styles().iter().map(ToString::to_string).collect(),
            current_color: self.current_color.to_string(),
            current_font_size: self.current_font_size,
            is_empty: !self.content().has_text(),
        }
    }

    fn engine(&self) -> StyleEngine<'_> {
        StyleEngine::new(&self.registry)
    }

    fn toggle(&mut self, tag: StyleTag) -> Result<()> {
        let Some(sel) = self.state.selection else {
            tracing::debug!("no selection");
            return Ok(());
        };
        let next = self.engine().toggle_independent(self.content(), &sel, &tag)?;
        self.state = self.state.with_content(next);
        Ok(())
    }

    fn set_exclusive(&mut self, category: Category, tag: &StyleTag) -> Result<()> {
        let Some(sel) = self.state.selection else {
            tracing::debug!("no selection");
            return Ok(());
        };
        let next = self.engine().set_exclusive(self.content(), &sel, category, tag)?;
        self.state = self.state.with_content(next);
        Ok(())
    }

    fn set_color(&mut self, hex: &str) -> Result<()> {
        let color = HexColor::parse(hex).ok_or_else(|| StyleError::InvalidColor(hex.to_string()))?;
        self.set_exclusive(Category::Color, &StyleTag::Color(color.clone()))?;
        self.current_color = color;
        Ok(())
    }

    fn set_font_size(&mut self, size: u16) -> Result<()> {
        let tag = StyleTag::FontSize(size);
        if !self.registry.contains(&tag) {
            return Err(StyleError::UnknownTag(tag.to_string()));
        }
        self.set_exclusive(Category::Size, &tag)?;
        self.current_font_size = size;
        Ok(())
    }

    fn step_font_size(&mut self, step: SizeStep) -> Result<()> {
        let current = self
            .active_styles()
            .of_category(Category::Size)
            .find_map(|tag| match tag {
                StyleTag::FontSize(size) => Some(*size),
                _ => None,
            })
            .unwrap_or(self.current_font_size);
        match self.registry.step_font_size(current, step) {
            Some(size) => self.set_font_size(size),
            None => {
                tracing::debug!(current, ?step, "font size already at the end of the ladder");
                Ok(())
            }
        }
    }

    fn set_alignment(&mut self, alignment: Alignment) {
        let Some(sel) = self.state.selection else {
            tracing::debug!("no selection");
            return;
        };
        let next = alignment::align_selection(self.content(), &sel, alignment);
        self.state = self.state.with_content(next);
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}
