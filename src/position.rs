//! Text positions with caret affinity.
//!
//! All coordinates are **0-indexed**. Line 0 is the first line, column 0 is
//! the first character. Columns count Unicode scalar values (chars), not
//! bytes — column 3 of `"café"` is `'é'`, never a byte inside its UTF-8
//! encoding.
//!
//! A position carries an optional *sticky* affinity: a caret sitting exactly
//! on a character boundary is either attached to the character before it
//! ([`Sticky::After`]) or to the character after it ([`Sticky::Before`]).
//! The distinction matters when the line is later edited at that exact
//! boundary. Comparison works on the *effective column* — `After` means "one
//! code unit further along than the raw column".

use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// Sticky
// ---------------------------------------------------------------------------

/// Caret affinity at a character boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sticky {
    /// The caret is attached to the character *after* the column.
    Before,
    /// The caret is attached to the character *before* the column — its
    /// effective column is `col + 1`.
    After,
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A position in a document: (line, column, sticky), 0-indexed.
///
/// Positions are immutable — edits produce new positions via the `with_*`
/// builders rather than mutating in place.
///
/// # Ordering
///
/// There is deliberately no `Ord` impl. Two positions with different raw
/// `(col, sticky)` pairs can occupy the same effective column; they would
/// compare `Equal` while being `!=`, violating the `Ord`/`PartialEq`
/// consistency contract. Use [`Position::compare`] for editing order and
/// [`Position::equal_caret`] for strict caret identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
    pub sticky: Option<Sticky>,
}

impl Position {
    /// The origin — line 0, column 0, no affinity.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a position with no affinity.
    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            sticky: None,
        }
    }

    /// Create a position attached to the character after the column — the
    /// canonical form for carets the document computes itself.
    #[inline]
    #[must_use]
    pub const fn before(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            sticky: Some(Sticky::Before),
        }
    }

    /// The column this position actually occupies for editing: the raw
    /// column, plus one when the caret is attached to the character before
    /// it.
    #[inline]
    #[must_use]
    pub const fn effective_col(self) -> usize {
        match self.sticky {
            Some(Sticky::After) => self.col + 1,
            _ => self.col,
        }
    }

    /// Editing order: line first, then effective column.
    #[inline]
    #[must_use]
    pub fn compare(self, other: Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then(self.effective_col().cmp(&other.effective_col()))
    }

    /// Strict caret identity: same line, same raw column, same sticky.
    ///
    /// Stricter than `compare(a, b) == Equal` — two carets can share an
    /// effective column yet be visually distinct.
    #[inline]
    #[must_use]
    pub fn equal_caret(self, other: Self) -> bool {
        self.line == other.line && self.col == other.col && self.sticky == other.sticky
    }

    /// The earlier of two positions in editing order.
    #[inline]
    #[must_use]
    pub fn min_pos(a: Self, b: Self) -> Self {
        if a.compare(b) == Ordering::Greater { b } else { a }
    }

    /// The later of two positions in editing order.
    #[inline]
    #[must_use]
    pub fn max_pos(a: Self, b: Self) -> Self {
        if a.compare(b) == Ordering::Less { b } else { a }
    }

    /// Copy with a different line.
    #[inline]
    #[must_use]
    pub const fn with_line(self, line: usize) -> Self {
        Self { line, ..self }
    }

    /// Copy with a different column.
    #[inline]
    #[must_use]
    pub const fn with_col(self, col: usize) -> Self {
        Self { col, ..self }
    }

    /// Copy with a different affinity.
    #[inline]
    #[must_use]
    pub const fn with_sticky(self, sticky: Option<Sticky>) -> Self {
        Self { sticky, ..self }
    }

    /// Order two arbitrary positions into a span.
    #[must_use]
    pub fn sort_two(a: Self, b: Self) -> SortedSpan {
        let is_empty = a.compare(b) == Ordering::Equal;
        if a.compare(b) == Ordering::Greater {
            SortedSpan {
                from: b,
                to: a,
                is_empty,
            }
        } else {
            SortedSpan {
                from: a,
                to: b,
                is_empty,
            }
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed for human display.
        write!(f, "{}:{}", self.line + 1, self.effective_col() + 1)
    }
}

// ---------------------------------------------------------------------------
// SortedSpan
// ---------------------------------------------------------------------------

/// A pair of positions normalized so that `from <= to` in editing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortedSpan {
    pub from: Position,
    pub to: Position,
    /// True when `from` and `to` occupy the same effective position — a
    /// caret, not a selection.
    pub is_empty: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
