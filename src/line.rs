//! A single document line.
//!
//! Lines are owned exclusively by the [`Document`](crate::document::Document)
//! and identified by a stable [`LineId`] that survives splices — the renderer
//! keys its per-line nodes on the id, so inserting or deleting neighbours
//! never invalidates the mapping. Successor relationships are implicit in the
//! document's line order; there are no sibling links to dangle.
//!
//! Columns are char offsets, never bytes. All splice helpers take char
//! columns and panic on out-of-range input — a stale column is a broken
//! caller contract, not a recoverable condition.

use std::fmt;

use crate::change::INDENT_UNIT;

// ---------------------------------------------------------------------------
// LineId
// ---------------------------------------------------------------------------

/// Stable identity of a line, unique within one document for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(pub(crate) u64);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// EffectKind
// ---------------------------------------------------------------------------

/// How a line differs from what was last rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// The line's text changed in place.
    Updated,
    /// The line was removed from the document.
    Deleted,
    /// The line is new and has never been rendered.
    Inserted,
}

// ---------------------------------------------------------------------------
// Line
// ---------------------------------------------------------------------------

/// One line of text plus its pending visual effect.
///
/// The `effect` tag is transient: set when an edit touches the line, cleared
/// when the rendering collaborator drains the effect queue.
#[derive(Debug, Clone)]
pub struct Line {
    id: LineId,
    text: String,
    effect: Option<EffectKind>,
}

impl Line {
    pub(crate) const fn new(id: LineId, text: String) -> Self {
        Self {
            id,
            text,
            effect: None,
        }
    }

    /// Stable identity of this line.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> LineId {
        self.id
    }

    /// The line's text, without any line terminator.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in chars.
    #[inline]
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// The pending visual effect, if any.
    #[inline]
    #[must_use]
    pub const fn effect(&self) -> Option<EffectKind> {
        self.effect
    }

    pub(crate) const fn set_effect(&mut self, kind: EffectKind) {
        self.effect = Some(kind);
    }

    pub(crate) const fn clear_effect(&mut self) {
        self.effect = None;
    }

    // -- Splicing -----------------------------------------------------------

    /// Byte offset of a char column. `col == char_len()` maps to the end.
    ///
    /// # Panics
    ///
    /// Panics if `col` is past the end of the line.
    fn byte_of(&self, col: usize) -> usize {
        if let Some((byte, _)) = self.text.char_indices().nth(col) {
            byte
        } else {
            assert!(
                col == self.char_len(),
                "column {col} out of bounds on line {} ({} chars)",
                self.id,
                self.char_len(),
            );
            self.text.len()
        }
    }

    /// The text before `col`.
    #[must_use]
    pub fn head(&self, col: usize) -> &str {
        &self.text[..self.byte_of(col)]
    }

    /// The text from `col` to the end.
    #[must_use]
    pub fn tail(&self, col: usize) -> &str {
        &self.text[self.byte_of(col)..]
    }

    /// The text spanning `[start, end)` in char columns.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &str {
        debug_assert!(start <= end, "slice start {start} past end {end}");
        &self.text[self.byte_of(start)..self.byte_of(end)]
    }

    /// Splice `s` into the line at `col`.
    pub(crate) fn insert_at(&mut self, col: usize, s: &str) {
        let byte = self.byte_of(col);
        self.text.insert_str(byte, s);
    }

    /// Remove `[start, end)` in char columns, returning the removed text.
    pub(crate) fn remove_range(&mut self, start: usize, end: usize) -> String {
        let from = self.byte_of(start);
        let to = self.byte_of(end);
        self.text.drain(from..to).collect()
    }

    /// Replace the whole text.
    pub(crate) fn replace_text(&mut self, text: String) {
        self.text = text;
    }

    // -- Indentation --------------------------------------------------------

    /// The leading indent a shift-tab strips from this line: a single tab,
    /// or up to one indent unit of spaces. Empty when the line has no
    /// leading indentation left.
    #[must_use]
    pub fn unindent_prefix(&self) -> &str {
        if self.text.starts_with('\t') {
            return &self.text[..1];
        }
        let spaces = self
            .text
            .bytes()
            .take(INDENT_UNIT.len())
            .take_while(|&b| b == b' ')
            .count();
        &self.text[..spaces]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn line(text: &str) -> Line {
        Line::new(LineId(0), text.to_string())
    }

    // -- Text access --------------------------------------------------------

    #[test]
    fn char_len_counts_chars_not_bytes() {
        assert_eq!(line("café").char_len(), 4);
        assert_eq!(line("").char_len(), 0);
    }

    #[test]
    fn head_and_tail_split_at_char_column() {
        let l = line("café au lait");
        assert_eq!(l.head(4), "café");
        assert_eq!(l.tail(4), " au lait");
        assert_eq!(l.head(0), "");
        assert_eq!(l.tail(12), "");
    }

    #[test]
    fn slice_spans_char_columns() {
        let l = line("héllo");
        assert_eq!(l.slice(1, 4), "éll");
        assert_eq!(l.slice(2, 2), "");
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn column_past_end_panics() {
        line("ab").head(3);
    }

    // -- Splicing -----------------------------------------------------------

    #[test]
    fn insert_at_middle() {
        let mut l = line("hllo");
        l.insert_at(1, "e");
        assert_eq!(l.text(), "hello");
    }

    #[test]
    fn insert_at_end() {
        let mut l = line("ab");
        l.insert_at(2, "c");
        assert_eq!(l.text(), "abc");
    }

    #[test]
    fn remove_range_returns_removed() {
        let mut l = line("héllo");
        let removed = l.remove_range(1, 3);
        assert_eq!(removed, "él");
        assert_eq!(l.text(), "hlo");
    }

    // -- Effects ------------------------------------------------------------

    #[test]
    fn effect_set_and_clear() {
        let mut l = line("x");
        assert_eq!(l.effect(), None);
        l.set_effect(EffectKind::Updated);
        assert_eq!(l.effect(), Some(EffectKind::Updated));
        l.clear_effect();
        assert_eq!(l.effect(), None);
    }

    // -- Indentation --------------------------------------------------------

    #[test]
    fn unindent_prefix_strips_indent_unit() {
        assert_eq!(line("    four").unindent_prefix(), "  ");
        assert_eq!(line("  two").unindent_prefix(), "  ");
        assert_eq!(line(" one").unindent_prefix(), " ");
        assert_eq!(line("none").unindent_prefix(), "");
        assert_eq!(line("").unindent_prefix(), "");
    }

    #[test]
    fn unindent_prefix_prefers_single_tab() {
        assert_eq!(line("\t\tdeep").unindent_prefix(), "\t");
    }
}
