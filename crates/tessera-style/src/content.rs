//! Internal editable state: ordered blocks with dense per-character styles.
//!
//! Each [`StyledBlock`] owns its text and one [`StyleSet`] per UTF-16 code
//! unit of that text (the unit wire indices count in). A [`ContentState`] is
//! an immutable snapshot: mutations clone it and replace only the touched
//! blocks, so earlier snapshots stay valid and share untouched blocks.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tessera_types::Alignment;

use crate::selection::{Position, ResolvedSelection, Selection, Span};
use crate::tag::{StyleSet, StyleTag};

/// Stable identity of a block within one editing session.
///
/// Keys are assigned in creation order and never reused by a snapshot line,
/// so a selection can keep targeting the same block across mutations.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockKey(u64);

impl BlockKey {
    pub fn new(seq: u64) -> Self {
        Self(seq)
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

impl fmt::Debug for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockKey({})", self.0)
    }
}

/// One block of text with its alignment and per-character styles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledBlock {
    key: BlockKey,
    text: String,
    /// `None` for blocks that never had an alignment set.
    alignment: Option<Alignment>,
    /// One entry per UTF-16 code unit of `text`.
    styles: Vec<StyleSet>,
}

impl StyledBlock {
    /// Create an unstyled block with no alignment attribute.
    pub fn new(key: BlockKey, text: impl Into<String>) -> Self {
        let text = text.into();
        let len = text.encode_utf16().count();
        Self {
            key,
            text,
            alignment: None,
            styles: vec![StyleSet::new(); len],
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn key(&self) -> BlockKey {
        self.key
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Stored alignment, `Left` when the block never had one.
    pub fn alignment(&self) -> Alignment {
        self.alignment.unwrap_or_default()
    }

    /// Whether an alignment attribute has been set on this block.
    pub fn has_alignment(&self) -> bool {
        self.alignment.is_some()
    }

    /// Active tags at `index`.
    pub fn styles_at(&self, index: usize) -> Option<&StyleSet> {
        self.styles.get(index)
    }

    /// Per-position tag sets, in order.
    pub fn styles(&self) -> &[StyleSet] {
        &self.styles
    }

    /// Whether every position satisfies color/size exclusivity.
    pub fn is_consistent(&self) -> bool {
        self.styles.iter().all(StyleSet::is_consistent)
    }

    pub(crate) fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = Some(alignment);
    }

    /// Add `tag` at `index`. Returns `false` if `index` is out of range.
    pub(crate) fn mark(&mut self, index: usize, tag: StyleTag) -> bool {
        match self.styles.get_mut(index) {
            Some(set) => {
                set.insert(tag);
                true
            }
            None => false,
        }
    }

    /// Mutable tag sets for `span`, clamped to the block.
    pub(crate) fn span_mut(&mut self, span: &Span) -> &mut [StyleSet] {
        let end = span.end.min(self.styles.len());
        let start = span.start.min(end);
        &mut self.styles[start..end]
    }
}

/// Immutable snapshot of the whole document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentState {
    blocks: Vec<Arc<StyledBlock>>,
    /// Next key sequence number.
    next_seq: u64,
}

impl ContentState {
    /// A document with no blocks.
    pub fn new() -> Self {
        Self::default()
    }

    /// A document with a single empty block, as a fresh editor shows.
    pub fn with_empty_block() -> Self {
        let mut content = Self::new();
        content.push_block("", None);
        content
    }

    /// Append a block, assigning it the next key.
    pub fn push_block(&mut self, text: impl Into<String>, alignment: Option<Alignment>) -> BlockKey {
        let key = BlockKey::new(self.next_seq);
        self.next_seq += 1;
        let mut block = StyledBlock::new(key, text);
        block.alignment = alignment;
        self.blocks.push(Arc::new(block));
        key
    }

    /// Blocks in document order.
    pub fn blocks(&self) -> impl ExactSizeIterator<Item = &StyledBlock> {
        self.blocks.iter().map(|b| b.as_ref())
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Whether any block contains text.
    pub fn has_text(&self) -> bool {
        self.blocks.iter().any(|b| !b.is_empty())
    }

    pub fn block(&self, key: BlockKey) -> Option<&StyledBlock> {
        self.blocks.iter().find(|b| b.key == key).map(|b| b.as_ref())
    }

    pub fn block_index(&self, key: BlockKey) -> Option<usize> {
        self.blocks.iter().position(|b| b.key == key)
    }

    /// First block, if any.
    pub fn first_block(&self) -> Option<&StyledBlock> {
        self.blocks.first().map(|b| b.as_ref())
    }

    /// Keys in document order.
    pub fn keys(&self) -> Vec<BlockKey> {
        self.blocks.iter().map(|b| b.key).collect()
    }

    /// Caret at the start of the first block.
    pub fn start_position(&self) -> Option<Position> {
        self.first_block().map(|b| Position::new(b.key, 0))
    }

    /// Whether every character of every block satisfies exclusivity.
    pub fn is_consistent(&self) -> bool {
        self.blocks.iter().all(|b| b.is_consistent())
    }

    /// Mutable access to one block. Copies the block first if an older
    /// snapshot still shares it.
    pub(crate) fn block_mut(&mut self, key: BlockKey) -> Option<&mut StyledBlock> {
        self.blocks
            .iter_mut()
            .find(|b| b.key == key)
            .map(Arc::make_mut)
    }

    /// Order, clamp and split a selection against this snapshot.
    ///
    /// Returns `None` when either endpoint names a block that is not in this
    /// snapshot (a stale selection).
    pub fn resolve(&self, selection: &Selection) -> Option<ResolvedSelection> {
        let a = self.clamp(selection.anchor)?;
        let f = self.clamp(selection.focus)?;
        let a_idx = self.block_index(a.block)?;
        let f_idx = self.block_index(f.block)?;

        let ((start, start_idx), (end, end_idx)) = if (f_idx, f.offset) < (a_idx, a.offset) {
            ((f, f_idx), (a, a_idx))
        } else {
            ((a, a_idx), (f, f_idx))
        };

        let spans = if start_idx == end_idx {
            vec![Span::new(start.block, start.offset, end.offset)]
        } else {
            self.blocks[start_idx..=end_idx]
                .iter()
                .enumerate()
                .map(|(i, block)| {
                    let from = if i == 0 { start.offset } else { 0 };
                    let to = if i == end_idx - start_idx { end.offset } else { block.len() };
                    Span::new(block.key, from, to)
                })
                .collect()
        };

        Some(ResolvedSelection { start, end, spans })
    }

    /// Clamp a position's offset to its block length.
    fn clamp(&self, pos: Position) -> Option<Position> {
        let block = self.block(pos.block)?;
        Some(Position::new(pos.block, pos.offset.min(block.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_blocks() -> (ContentState, Vec<BlockKey>) {
        let mut content = ContentState::new();
        let keys = vec![
            content.push_block("First", None),
            content.push_block("Second", Some(Alignment::Center)),
            content.push_block("Third", None),
        ];
        (content, keys)
    }

    #[test]
    fn test_block_len_counts_utf16() {
        let block = StyledBlock::new(BlockKey::new(0), "a😀b");
        assert_eq!(block.len(), 4);
        assert_eq!(block.styles().len(), 4);
    }

    #[test]
    fn test_alignment_defaults_to_left() {
        let (content, keys) = three_blocks();
        let first = content.block(keys[0]).unwrap();
        assert!(!first.has_alignment());
        assert_eq!(first.alignment(), Alignment::Left);
        assert_eq!(content.block(keys[1]).unwrap().alignment(), Alignment::Center);
    }

    #[test]
    fn test_keys_are_sequential() {
        let (content, keys) = three_blocks();
        assert_eq!(keys, vec![BlockKey::new(0), BlockKey::new(1), BlockKey::new(2)]);
        assert_eq!(content.keys(), keys);
        assert_eq!(content.block_index(keys[2]), Some(2));
    }

    #[test]
    fn test_with_empty_block() {
        let content = ContentState::with_empty_block();
        assert_eq!(content.block_count(), 1);
        assert!(!content.has_text());
        assert_eq!(content.start_position(), Some(Position::new(BlockKey::new(0), 0)));
    }

    #[test]
    fn test_resolve_single_block() {
        let (content, keys) = three_blocks();
        let resolved = content.resolve(&Selection::within(keys[0], 1, 3)).unwrap();
        assert_eq!(resolved.spans, vec![Span::new(keys[0], 1, 3)]);
        assert_eq!(resolved.anchor_block(), keys[0]);
    }

    #[test]
    fn test_resolve_backward_selection() {
        let (content, keys) = three_blocks();
        let sel = Selection::new(Position::new(keys[2], 2), Position::new(keys[0], 3));
        let resolved = content.resolve(&sel).unwrap();
        assert_eq!(resolved.start, Position::new(keys[0], 3));
        assert_eq!(resolved.end, Position::new(keys[2], 2));
        assert_eq!(
            resolved.spans,
            vec![
                Span::new(keys[0], 3, 5),
                Span::new(keys[1], 0, 6),
                Span::new(keys[2], 0, 2),
            ]
        );
        assert_eq!(resolved.anchor_block(), keys[0]);
    }

    #[test]
    fn test_resolve_clamps_offsets() {
        let (content, keys) = three_blocks();
        let resolved = content.resolve(&Selection::within(keys[0], 2, 100)).unwrap();
        assert_eq!(resolved.spans, vec![Span::new(keys[0], 2, 5)]);
    }

    #[test]
    fn test_resolve_stale_block() {
        let (content, _) = three_blocks();
        assert!(content.resolve(&Selection::within(BlockKey::new(99), 0, 1)).is_none());
    }

    #[test]
    fn test_block_mut_copies_shared_block() {
        let (mut content, keys) = three_blocks();
        let before = content.clone();
        content.block_mut(keys[0]).unwrap().mark(0, StyleTag::Bold);
        assert!(content.block(keys[0]).unwrap().styles_at(0).unwrap().contains(&StyleTag::Bold));
        assert!(before.block(keys[0]).unwrap().styles_at(0).unwrap().is_empty());
    }

    #[test]
    fn test_mark_out_of_range() {
        let mut block = StyledBlock::new(BlockKey::new(0), "ab");
        assert!(block.mark(1, StyleTag::Italic));
        assert!(!block.mark(2, StyleTag::Italic));
    }
}
