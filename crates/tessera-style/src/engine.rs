//! Style application engine.
//!
//! Applies and removes tags over the characters a selection covers, by
//! category:
//!
//! - Toggle tags flip per character. A mixed span ends up as the exact
//!   per-character complement, not uniformly on or off.
//! - Exclusive tags (color, size) first drop every tag of the category on each
//!   character, then add the new one. Applying the same tag twice is a no-op.
//!
//! Every call takes a snapshot and returns a new one; the input is never
//! modified. Collapsed or stale selections return an unchanged copy.

use crate::content::ContentState;
use crate::registry::StyleRegistry;
use crate::selection::{Position, Selection};
use crate::tag::{Category, StyleSet, StyleTag};
use crate::{Result, StyleError};

/// Applies style mutations validated against a registry.
#[derive(Clone, Copy, Debug)]
pub struct StyleEngine<'a> {
    registry: &'a StyleRegistry,
}

impl<'a> StyleEngine<'a> {
    pub fn new(registry: &'a StyleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a StyleRegistry {
        self.registry
    }

    /// Flip `tag` on every character of the selection.
    pub fn toggle_independent(
        &self,
        content: &ContentState,
        selection: &Selection,
        tag: &StyleTag,
    ) -> Result<ContentState> {
        self.check(tag, Category::Toggle)?;
        Ok(apply(content, selection, |set| set.toggle(tag)))
    }

    /// Replace whatever tag of `category` each selected character has with
    /// `tag`.
    pub fn set_exclusive(
        &self,
        content: &ContentState,
        selection: &Selection,
        category: Category,
        tag: &StyleTag,
    ) -> Result<ContentState> {
        if !category.is_exclusive() {
            return Err(StyleError::NotExclusive(category));
        }
        self.check(tag, category)?;
        Ok(apply(content, selection, |set| {
            set.clear_category(category);
            set.insert(tag.clone());
        }))
    }

    /// Remove every tag of `category` from the selection.
    pub fn clear_category(
        &self,
        content: &ContentState,
        selection: &Selection,
        category: Category,
    ) -> ContentState {
        apply(content, selection, |set| set.clear_category(category))
    }

    /// Tags active on every selected character.
    ///
    /// Tags present on only part of the selection are not reported. A
    /// collapsed selection reports the character before the caret (or the
    /// first character when the caret is at offset 0).
    pub fn current_active_set(&self, content: &ContentState, selection: &Selection) -> StyleSet {
        let Some(resolved) = content.resolve(selection) else {
            return StyleSet::new();
        };
        if resolved.is_empty() {
            return caret_styles(content, resolved.start);
        }

        let mut sets = resolved
            .spans
            .iter()
            .filter(|span| !span.is_empty())
            .filter_map(|span| content.block(span.block)?.styles().get(span.range()))
            .flatten();

        let Some(first) = sets.next() else {
            return StyleSet::new();
        };
        let mut active = first.clone();
        for set in sets {
            if active.is_empty() {
                break;
            }
            active.retain_common(set);
        }
        active
    }

    fn check(&self, tag: &StyleTag, expected: Category) -> Result<()> {
        if !self.registry.contains(tag) {
            return Err(StyleError::UnknownTag(tag.to_string()));
        }
        if tag.category() != expected {
            return Err(StyleError::CategoryMismatch {
                tag: tag.clone(),
                expected,
            });
        }
        Ok(())
    }
}

/// Run `f` on the tag set of every selected character of a copy of `content`.
fn apply(content: &ContentState, selection: &Selection, f: impl Fn(&mut StyleSet)) -> ContentState {
    let Some(resolved) = content.resolve(selection) else {
        tracing::debug!(?selection, "selection names a block not in this snapshot, ignoring");
        return content.clone();
    };
    if resolved.is_empty() {
        tracing::debug!(?selection, "empty selection, nothing to style");
        return content.clone();
    }

    let mut next = content.clone();
    for span in resolved.spans.iter().filter(|span| !span.is_empty()) {
        if let Some(block) = next.block_mut(span.block) {
            block.span_mut(span).iter_mut().for_each(&f);
        }
    }
    next
}

fn caret_styles(content: &ContentState, at: Position) -> StyleSet {
    let Some(block) = content.block(at.block) else {
        return StyleSet::new();
    };
    block
        .styles_at(at.offset.saturating_sub(1))
        .cloned()
        .unwrap_or_default()
}
