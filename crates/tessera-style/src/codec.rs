//! Document codec: [`FormattedDocument`] ⇄ [`ContentState`].
//!
//! # Import
//!
//! Each wire block becomes one internal block with the same text and
//! alignment (falling back to the document-level alignment when the block has
//! none). Each `(index, style)` entry marks that tag at that position,
//! additively. Entries with an index outside the text or an unrecognized style
//! are skipped and recorded in the [`ImportReport`]; the document as a whole
//! never fails. Exclusivity is *not* repaired on import: two colors at one
//! index both become active.
//!
//! # Export
//!
//! Blocks in order, text verbatim, one entry per active tag per position, and
//! the block's alignment. The document-level alignment is the first block's,
//! re-derived on every export.
//!
//! For every document whose entries respect color/size exclusivity,
//! `export(import(d))` equals `d` up to the order of `styles` within each
//! block.

use serde::Serialize;
use tessera_types::{Alignment, FormattedDocument, StyleEntry, WireBlock};

use crate::content::ContentState;
use crate::registry::StyleRegistry;

/// Why an import entry was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Negative, past the end of the block text, or not an integer.
    IndexOutOfRange,
    /// Not a tag the registry recognizes.
    UnknownStyle,
}

/// One dropped import entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// Block position in the input document.
    pub block: usize,
    pub index: i64,
    pub style: String,
    pub reason: SkipReason,
}

/// What import had to leave out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub skipped: Vec<SkippedEntry>,
    /// Blocks whose imported styles break color/size exclusivity.
    pub inconsistent_blocks: Vec<usize>,
}

impl ImportReport {
    /// True when every entry was imported and the result is consistent.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.inconsistent_blocks.is_empty()
    }
}

/// Build internal state from a formatted document, best effort.
pub fn import(doc: &FormattedDocument, registry: &StyleRegistry) -> ContentState {
    import_with_report(doc, registry).0
}

/// Like [`import`], also reporting dropped entries.
pub fn import_with_report(doc: &FormattedDocument, registry: &StyleRegistry) -> (ContentState, ImportReport) {
    let mut content = ContentState::new();
    let mut report = ImportReport::default();

    for (block_idx, wire) in doc.blocks.iter().enumerate() {
        let alignment = wire.alignment.unwrap_or(doc.alignment);
        let key = content.push_block(wire.text.as_str(), Some(alignment));
        let Some(block) = content.block_mut(key) else {
            continue;
        };

        for entry in &wire.styles {
            let skip = |reason| SkippedEntry {
                block: block_idx,
                index: entry.index,
                style: entry.style.clone(),
                reason,
            };
            let Some(tag) = registry.resolve(&entry.style) else {
                tracing::warn!(block = block_idx, style = %entry.style, "skipping unrecognized style");
                report.skipped.push(skip(SkipReason::UnknownStyle));
                continue;
            };
            let marked = usize::try_from(entry.index)
                .map(|index| block.mark(index, tag))
                .unwrap_or(false);
            if !marked {
                tracing::warn!(
                    block = block_idx,
                    index = entry.index,
                    len = block.len(),
                    "skipping style outside block text"
                );
                report.skipped.push(skip(SkipReason::IndexOutOfRange));
            }
        }

        if !block.is_consistent() {
            tracing::warn!(block = block_idx, "imported block has conflicting color or size tags");
            report.inconsistent_blocks.push(block_idx);
        }
    }

    tracing::trace!(
        blocks = content.block_count(),
        skipped = report.skipped.len(),
        "imported formatted document"
    );
    (content, report)
}

/// Extract the formatted document from internal state.
pub fn export(content: &ContentState) -> FormattedDocument {
    let blocks: Vec<WireBlock> = content
        .blocks()
        .map(|block| {
            let styles = block
                .styles()
                .iter()
                .enumerate()
                .flat_map(|(i, set)| set.iter().map(move |tag| StyleEntry::new(i as i64, tag.to_string())))
                .collect();
            WireBlock {
                text: block.text().to_string(),
                alignment: Some(block.alignment()),
                styles,
            }
        })
        .collect();

    let alignment = content
        .first_block()
        .map(|b| b.alignment())
        .unwrap_or(Alignment::Left);

    FormattedDocument { alignment, blocks }
}
