//! Block alignment manager.
//!
//! Alignment is a block attribute with no per-character granularity and no
//! exclusivity bookkeeping: setting it is a direct overwrite. When a selection
//! spans several blocks only the block containing its start changes.

use tessera_types::Alignment;

use crate::content::{BlockKey, ContentState};
use crate::selection::Selection;
use crate::{Result, StyleError};

/// Overwrite the alignment of one block.
pub fn set_alignment(content: &ContentState, block: BlockKey, alignment: Alignment) -> Result<ContentState> {
    let mut next = content.clone();
    let target = next.block_mut(block).ok_or(StyleError::BlockNotFound(block))?;
    target.set_alignment(alignment);
    Ok(next)
}

/// Stored alignment of a block, `Left` if it never had one.
pub fn get_alignment(content: &ContentState, block: BlockKey) -> Result<Alignment> {
    content
        .block(block)
        .map(|b| b.alignment())
        .ok_or(StyleError::BlockNotFound(block))
}

/// Align the anchor block of `selection`.
///
/// A stale selection leaves the content unchanged.
pub fn align_selection(content: &ContentState, selection: &Selection, alignment: Alignment) -> ContentState {
    let Some(resolved) = content.resolve(selection) else {
        tracing::debug!(?selection, "selection names a block not in this snapshot, ignoring");
        return content.clone();
    };
    match set_alignment(content, resolved.anchor_block(), alignment) {
        Ok(next) => next,
        Err(e) => {
            tracing::debug!("alignment not applied: {e}");
            content.clone()
        }
    }
}

/// Alignment of the selection's anchor block, for the toolbar indicator.
pub fn selection_alignment(content: &ContentState, selection: &Selection) -> Alignment {
    content
        .resolve(selection)
        .and_then(|r| get_alignment(content, r.anchor_block()).ok())
        .unwrap_or_default()
}
