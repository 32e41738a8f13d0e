//! Cursor positions, selections, and the per-block spans they cover.

use serde::{Deserialize, Serialize};

use crate::content::BlockKey;

/// A cursor position: a block plus a UTF-16 code-unit offset into its text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub block: BlockKey,
    pub offset: usize,
}

impl Position {
    pub fn new(block: BlockKey, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// A selection as the editing surface reports it.
///
/// `anchor` is where the selection started, `focus` where it ends; a
/// backward selection has `focus` before `anchor` in document order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

impl Selection {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    /// A caret with no extent.
    pub fn collapsed(at: Position) -> Self {
        Self {
            anchor: at,
            focus: at,
        }
    }

    /// Selection of `[start, end)` inside a single block.
    pub fn within(block: BlockKey, start: usize, end: usize) -> Self {
        Self::new(Position::new(block, start), Position::new(block, end))
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// A contiguous `[start, end)` range within one block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub block: BlockKey,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(block: BlockKey, start: usize, end: usize) -> Self {
        Self { block, start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end.max(self.start)
    }
}

/// A selection resolved against a particular content snapshot: endpoints
/// ordered and clamped, and split into one span per covered block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedSelection {
    /// Earlier endpoint in document order.
    pub start: Position,
    /// Later endpoint in document order.
    pub end: Position,
    /// One span per block from `start.block` to `end.block`, in order.
    pub spans: Vec<Span>,
}

impl ResolvedSelection {
    /// Block containing the start of the selection; the target of
    /// block-scoped changes such as alignment.
    pub fn anchor_block(&self) -> BlockKey {
        self.start.block
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Whether every covered span is empty.
    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(Span::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapsed() {
        let sel = Selection::collapsed(Position::new(BlockKey::new(0), 3));
        assert!(sel.is_collapsed());
        assert!(!Selection::within(BlockKey::new(0), 0, 2).is_collapsed());
    }

    #[test]
    fn test_span_len() {
        let span = Span::new(BlockKey::new(1), 2, 5);
        assert_eq!(span.len(), 3);
        assert_eq!(span.range(), 2..5);
        assert!(Span::new(BlockKey::new(1), 4, 4).is_empty());
    }

    #[test]
    fn test_selection_serde_shape() {
        let sel = Selection::within(BlockKey::new(2), 1, 4);
        let value = serde_json::to_value(sel).unwrap();
        assert_eq!(value["anchor"]["block"], 2);
        assert_eq!(value["anchor"]["offset"], 1);
        assert_eq!(value["focus"]["offset"], 4);
    }
}
