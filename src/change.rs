//! Edit descriptions — the immutable unit handed to `Document::apply`.
//!
//! A [`Change`] says "replace the text spanning `[from, to)` with these line
//! fragments". Fragments are the pieces between line breaks: a list of length
//! one is single-line text, length two means the edit spans one line break,
//! and so on. The [`Origin`] tag selects both the forward line-mutation
//! algorithm and the inverse used by undo — it is a closed enum so the
//! compiler checks that every operation kind is handled.

use crate::position::{Position, SortedSpan};

/// The fixed indent unit a Tab inserts (and a shift-Tab strips).
pub const INDENT_UNIT: &str = "  ";

// ---------------------------------------------------------------------------
// Origin
// ---------------------------------------------------------------------------

/// Which edit operation produced a change.
///
/// `DragMove` carries its drop target as variant payload — it is the one
/// operation whose effect depends on a second position, and keeping it on
/// the variant avoids an optional field every other kind would ignore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Typed input.
    InsertText,
    /// IME composition update; an entire session coalesces into one undo
    /// step.
    ComposeText,
    /// Enter — split the line at the caret.
    SplitLine,
    /// Backspace.
    DeleteBackward,
    /// Forward delete.
    DeleteForward,
    /// Tab — insert the indent unit.
    Indent,
    /// Shift-Tab — strip a previously recorded indent prefix per line.
    Unindent,
    /// Cut to clipboard; with no selection, cuts the whole caret line.
    Cut,
    /// Clipboard paste.
    Paste,
    /// Drag a selection and drop it at `drop`.
    DragMove { drop: Position },
    /// Re-enter the document through history.
    Undo,
    /// Re-apply the last undone change.
    Redo,
}

impl Origin {
    /// True when `self` and `other` are the same operation kind, ignoring
    /// any payload.
    #[inline]
    #[must_use]
    pub fn same_kind(self, other: Self) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }

    /// Operation kinds whose zero-width runs coalesce into one undo step.
    #[inline]
    #[must_use]
    pub const fn is_mergeable(self) -> bool {
        matches!(
            self,
            Self::DeleteBackward | Self::DeleteForward | Self::InsertText
        )
    }
}

// ---------------------------------------------------------------------------
// Change
// ---------------------------------------------------------------------------

/// One edit: replace `[from, to)` with `inserted`.
///
/// `removed` holds the literal fragments that occupied `[from, to)` before
/// the edit; it is populated whenever the change must later be inverted.
/// For [`Origin::Unindent`] it instead carries the per-line indent prefixes
/// the caller computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub from: Position,
    pub to: Position,
    pub origin: Origin,
    pub inserted: Vec<String>,
    pub removed: Option<Vec<String>>,
}

impl Change {
    /// Create a change. `from` and `to` are stored as given — a backwards
    /// selection produces a backwards pair, and [`sort`](Self::sort)
    /// normalizes it at application time.
    #[must_use]
    pub const fn new(from: Position, to: Position, origin: Origin, inserted: Vec<String>) -> Self {
        Self {
            from,
            to,
            origin,
            inserted,
            removed: None,
        }
    }

    /// Attach the removed text needed to invert this change.
    #[must_use]
    pub fn with_removed(mut self, removed: Vec<String>) -> Self {
        self.removed = Some(removed);
        self
    }

    /// The normalized span this change covers.
    #[inline]
    #[must_use]
    pub fn sort(&self) -> SortedSpan {
        Position::sort_two(self.from, self.to)
    }
}

// ---------------------------------------------------------------------------
// Fragment utilities
// ---------------------------------------------------------------------------

/// Split text into line fragments on `\r\n`, `\r`, or `\n`.
///
/// Always yields at least one fragment — `""` splits to `[""]`.
#[must_use]
pub fn split_fragments(text: &str) -> Vec<String> {
    let mut fragments = Vec::with_capacity(1);
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\n' => fragments.push(std::mem::take(&mut current)),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                fragments.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fragments.push(current);
    fragments
}

/// Join fragments back into text with `\n` between them.
#[must_use]
pub fn join_fragments(fragments: &[String]) -> String {
    fragments.join("\n")
}

/// Concatenate two fragment lists in document order, merging at the
/// junction: the first fragment of `b` continues the last fragment of `a`.
#[must_use]
pub fn concat_fragments(mut a: Vec<String>, b: Vec<String>) -> Vec<String> {
    let mut b = b.into_iter();
    if let Some(first) = b.next() {
        match a.last_mut() {
            Some(last) => last.push_str(&first),
            None => a.push(first),
        }
    }
    a.extend(b);
    a
}

/// The position just past text inserted at `start` — same line advanced by
/// the fragment length for single-line text, or the last fragment's length
/// on the final line for multi-line text.
#[must_use]
pub fn end_of_fragments(start: Position, fragments: &[String]) -> Position {
    match fragments {
        [] => Position::before(start.line, start.effective_col()),
        [only] => Position::before(
            start.line,
            start.effective_col() + only.chars().count(),
        ),
        [.., last] => Position::before(
            start.line + fragments.len() - 1,
            last.chars().count(),
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // -- Construction -------------------------------------------------------

    #[test]
    fn new_accepts_ordered_span() {
        let c = Change::new(
            Position::new(0, 1),
            Position::new(1, 0),
            Origin::InsertText,
            vec!["x".into()],
        );
        assert_eq!(c.removed, None);
        assert!(!c.sort().is_empty);
    }

    #[test]
    fn new_accepts_collapsed_span() {
        let p = Position::new(2, 3);
        let c = Change::new(p, p, Origin::SplitLine, vec![]);
        assert!(c.sort().is_empty);
    }

    #[test]
    fn sort_normalizes_reversed_span() {
        let c = Change::new(
            Position::new(1, 0),
            Position::new(0, 0),
            Origin::InsertText,
            vec![],
        );
        let span = c.sort();
        assert_eq!(span.from, Position::new(0, 0));
        assert_eq!(span.to, Position::new(1, 0));
    }

    #[test]
    fn with_removed_attaches_fragments() {
        let p = Position::ZERO;
        let c = Change::new(p, p, Origin::DeleteBackward, vec![])
            .with_removed(vec!["a".into()]);
        assert_eq!(c.removed, Some(vec!["a".to_string()]));
    }

    // -- Origin -------------------------------------------------------------

    #[test]
    fn same_kind_ignores_drag_payload() {
        let a = Origin::DragMove {
            drop: Position::ZERO,
        };
        let b = Origin::DragMove {
            drop: Position::new(3, 3),
        };
        assert!(a.same_kind(b));
        assert!(!a.same_kind(Origin::Paste));
    }

    #[test]
    fn mergeable_kinds() {
        assert!(Origin::InsertText.is_mergeable());
        assert!(Origin::DeleteBackward.is_mergeable());
        assert!(Origin::DeleteForward.is_mergeable());
        assert!(!Origin::ComposeText.is_mergeable());
        assert!(!Origin::Paste.is_mergeable());
        assert!(!Origin::Indent.is_mergeable());
    }

    // -- split_fragments ----------------------------------------------------

    #[test]
    fn split_single_line() {
        assert_eq!(split_fragments("abc"), vec!["abc"]);
    }

    #[test]
    fn split_empty_text() {
        assert_eq!(split_fragments(""), vec![""]);
    }

    #[test]
    fn split_lf() {
        assert_eq!(split_fragments("a\nb\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn split_crlf_and_lone_cr() {
        assert_eq!(split_fragments("a\r\nb\rc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn split_trailing_newline_yields_empty_fragment() {
        assert_eq!(split_fragments("a\n"), vec!["a", ""]);
    }

    #[test]
    fn split_lone_newline() {
        assert_eq!(split_fragments("\n"), vec!["", ""]);
    }

    // -- join / concat ------------------------------------------------------

    #[test]
    fn join_round_trips_lf_text() {
        let text = "a\nb\n\nc";
        assert_eq!(join_fragments(&split_fragments(text)), text);
    }

    #[test]
    fn concat_merges_at_junction() {
        let a = vec!["ab".to_string()];
        let b = vec!["cd".to_string()];
        assert_eq!(concat_fragments(a, b), vec!["abcd"]);
    }

    #[test]
    fn concat_preserves_line_breaks() {
        // "x\n" followed by "y" is "x\ny".
        let a = vec!["x".to_string(), String::new()];
        let b = vec!["y".to_string()];
        assert_eq!(concat_fragments(a, b), vec!["x", "y"]);
    }

    #[test]
    fn concat_with_empty_sides() {
        assert_eq!(
            concat_fragments(vec![], vec!["a".to_string()]),
            vec!["a"]
        );
        assert_eq!(concat_fragments(vec!["a".to_string()], vec![]), vec!["a"]);
    }

    // -- end_of_fragments ---------------------------------------------------

    #[test]
    fn end_single_fragment_advances_column() {
        let end = end_of_fragments(Position::new(3, 5), &["hi".to_string()]);
        assert_eq!((end.line, end.col), (3, 7));
    }

    #[test]
    fn end_respects_sticky_start() {
        use crate::position::Sticky;
        let start = Position::new(3, 5).with_sticky(Some(Sticky::After));
        let end = end_of_fragments(start, &["hi".to_string()]);
        assert_eq!((end.line, end.col), (3, 8));
    }

    #[test]
    fn end_multi_fragment_lands_on_last_line() {
        let frags: Vec<String> = vec!["a".into(), "bb".into(), "ccc".into()];
        let end = end_of_fragments(Position::new(1, 9), &frags);
        assert_eq!((end.line, end.col), (3, 3));
    }

    #[test]
    fn end_counts_chars_not_bytes() {
        let end = end_of_fragments(Position::ZERO, &["café".to_string()]);
        assert_eq!((end.line, end.col), (0, 4));
    }
}
