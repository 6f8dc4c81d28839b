//! Selections — an anchor/head pair of positions.
//!
//! `anchor` is where the user started selecting; `head` is the live end that
//! moves as the selection extends. A selection whose anchor and head occupy
//! the same effective position is *collapsed* — just a caret.

use crate::position::{Position, SortedSpan};

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// An ordered pair of positions describing a selection.
///
/// The pair is stored as the user produced it — `head` may precede `anchor`
/// when the selection was dragged backwards. Use [`sort`](Self::sort) for a
/// normalized span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub head: Position,
}

impl Selection {
    /// Create a selection from anchor and head.
    #[inline]
    #[must_use]
    pub const fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    /// A collapsed selection — anchor and head at the same position.
    #[inline]
    #[must_use]
    pub const fn caret(pos: Position) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    /// Move the live end while the selection is being extended.
    #[inline]
    pub const fn update_head(&mut self, pos: Position) {
        self.head = pos;
    }

    /// True when the selection spans at least one character.
    #[inline]
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.anchor.compare(self.head) != std::cmp::Ordering::Equal
    }

    /// Normalize into a `from <= to` span.
    #[inline]
    #[must_use]
    pub fn sort(self) -> SortedSpan {
        Position::sort_two(self.anchor, self.head)
    }

    /// True when `pos` falls within the selection, inclusive at both ends.
    ///
    /// Inclusive bounds match how drag-and-drop decides whether a drop
    /// landed back inside the dragged selection.
    #[must_use]
    pub fn contains(self, pos: Position) -> bool {
        use std::cmp::Ordering::{Greater, Less};
        let span = self.sort();
        span.from.compare(pos) != Greater && span.to.compare(pos) != Less
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn caret_is_collapsed() {
        let sel = Selection::caret(Position::new(1, 3));
        assert!(!sel.is_valid());
        assert_eq!(sel.anchor, sel.head);
    }

    #[test]
    fn forward_selection_is_valid() {
        let sel = Selection::new(Position::new(0, 0), Position::new(0, 4));
        assert!(sel.is_valid());
    }

    #[test]
    fn sticky_only_difference_is_not_valid() {
        // Same effective position, different raw forms — still a caret.
        let a = Position::new(0, 3).with_sticky(Some(crate::position::Sticky::After));
        let b = Position::before(0, 4);
        assert!(!Selection::new(a, b).is_valid());
    }

    #[test]
    fn sort_backwards_selection() {
        let anchor = Position::new(2, 1);
        let head = Position::new(0, 5);
        let span = Selection::new(anchor, head).sort();
        assert_eq!(span.from, head);
        assert_eq!(span.to, anchor);
        assert!(!span.is_empty);
    }

    #[test]
    fn update_head_moves_live_end() {
        let mut sel = Selection::caret(Position::new(0, 0));
        sel.update_head(Position::new(1, 2));
        assert!(sel.is_valid());
        assert_eq!(sel.head, Position::new(1, 2));
    }

    #[test]
    fn contains_is_inclusive() {
        let sel = Selection::new(Position::new(0, 2), Position::new(1, 4));
        assert!(sel.contains(Position::new(0, 2)));
        assert!(sel.contains(Position::new(0, 9)));
        assert!(sel.contains(Position::new(1, 4)));
        assert!(!sel.contains(Position::new(0, 1)));
        assert!(!sel.contains(Position::new(1, 5)));
    }

    #[test]
    fn contains_works_on_backwards_selection() {
        let sel = Selection::new(Position::new(1, 4), Position::new(0, 2));
        assert!(sel.contains(Position::new(0, 7)));
        assert!(!sel.contains(Position::new(2, 0)));
    }
}
