//! The document — the line store plus caret, selection, history, and the
//! effect queue, behind one `apply` entry point.
//!
//! Every edit arrives as a [`Change`] and goes through [`Document::apply`],
//! which mutates the lines, recomputes caret and selection, records the
//! change for undo, and tags the touched lines in the effect queue. The
//! returned [`EffectDelta`] tells the caller which pre-edit lines went stale
//! and how much rendering work is pending; boundary no-ops (backspace at the
//! document start, unindent with nothing to strip, a drop inside the dragged
//! selection) return [`EffectDelta::NONE`] and leave history untouched.
//!
//! Undo and redo are changes too — apply a change with [`Origin::Undo`] or
//! [`Origin::Redo`], or call [`Document::undo`]/[`Document::redo`] directly.
//! Inverses are derived from the recorded change, so undo of any edit
//! restores the exact prior text, caret, and selection.

use std::cmp::Ordering;

use log::{debug, trace};

use crate::change::{
    Change, INDENT_UNIT, Origin, end_of_fragments, join_fragments, split_fragments,
};
use crate::effect::{Effect, EffectDelta, EffectQueue};
use crate::history::{History, HistoryRecord};
use crate::line::{EffectKind, Line, LineId};
use crate::position::{Position, SortedSpan, Sticky};
use crate::selection::Selection;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// An editable, line-oriented text document.
///
/// Always holds at least one line — an empty document is one empty line.
#[derive(Debug)]
pub struct Document {
    lines: Vec<Line>,
    next_id: u64,
    caret: Position,
    selection: Option<Selection>,
    history: History,
    effects: EffectQueue,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document: one empty line, caret at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Build a document from text, splitting on `\r\n`, `\r`, or `\n`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self {
            lines: Vec::new(),
            next_id: 0,
            caret: Position::ZERO,
            selection: None,
            history: History::new(),
            effects: EffectQueue::new(),
        };
        for fragment in split_fragments(text) {
            let line = doc.alloc_line(fragment);
            doc.lines.push(line);
        }
        doc
    }

    /// Replace the whole document, discarding history, pending effects,
    /// caret, and selection.
    pub fn reset(&mut self, text: &str) {
        debug!("document reset ({} bytes)", text.len());
        self.lines.clear();
        for fragment in split_fragments(text) {
            let line = self.alloc_line(fragment);
            self.lines.push(line);
        }
        self.caret = Position::ZERO;
        self.selection = None;
        self.history.clear();
        self.effects.clear();
    }

    fn alloc_line(&mut self, text: String) -> Line {
        let id = LineId(self.next_id);
        self.next_id += 1;
        Line::new(id, text)
    }

    // -- Accessors ----------------------------------------------------------

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The line at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds; use [`line_text`](Self::line_text)
    /// for a fallible lookup.
    #[must_use]
    pub fn line(&self, index: usize) -> &Line {
        &self.lines[index]
    }

    /// The text of the line at `index`, if it exists.
    #[must_use]
    pub fn line_text(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(Line::text)
    }

    /// Char length of the line at `index`.
    #[must_use]
    pub fn line_len(&self, index: usize) -> usize {
        self.lines[index].char_len()
    }

    #[must_use]
    pub fn last_line_index(&self) -> usize {
        self.lines.len() - 1
    }

    /// Iterate the lines in document order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    /// The whole document as one string, lines joined with `\n`.
    #[must_use]
    pub fn full_text(&self) -> String {
        let fragments: Vec<String> = self.lines.iter().map(|l| l.text().to_string()).collect();
        join_fragments(&fragments)
    }

    #[must_use]
    pub const fn caret(&self) -> Position {
        self.caret
    }

    #[must_use]
    pub const fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// The selected text, `None` when the selection is absent or collapsed.
    #[must_use]
    pub fn selected_text(&self) -> Option<String> {
        let sel = self.selection.filter(|s| s.is_valid())?;
        let span = sel.sort();
        Some(join_fragments(&self.span_fragments(span.from, span.to)))
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Resolve a (line, column) pair into a position.
    ///
    /// # Panics
    ///
    /// Panics if `line` or `col` is out of bounds.
    #[must_use]
    pub fn position_at(&self, line: usize, col: usize, sticky: Option<Sticky>) -> Position {
        assert!(
            line < self.line_count(),
            "line {line} out of bounds ({} lines)",
            self.line_count(),
        );
        assert!(
            col <= self.line_len(line),
            "column {col} out of bounds on line {line} ({} chars)",
            self.line_len(line),
        );
        Position { line, col, sticky }
    }

    // -- Caret and selection ------------------------------------------------

    /// Move the caret, collapsing any selection. Breaks the undo coalescing
    /// run: the next typed character starts a fresh undo step.
    pub fn set_caret(&mut self, pos: Position) {
        self.assert_in_bounds(pos);
        self.caret = pos;
        self.selection = None;
        self.history.break_run();
    }

    /// Set the selection; the caret follows the head. A collapsed selection
    /// degrades to a plain caret. Breaks the undo coalescing run.
    pub fn set_selection(&mut self, sel: Selection) {
        self.assert_in_bounds(sel.anchor);
        self.assert_in_bounds(sel.head);
        self.caret = sel.head;
        self.selection = if sel.is_valid() { Some(sel) } else { None };
        self.history.break_run();
    }

    /// Select the whole document, head at the end.
    pub fn select_all(&mut self) {
        let last = self.last_line_index();
        let head = Position::before(last, self.line_len(last));
        self.set_selection(Selection::new(Position::before(0, 0), head));
    }

    // -- Effects ------------------------------------------------------------

    /// Take every pending effect in queue order and clear the per-line tags.
    /// Called by the rendering collaborator once per sync cycle.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        let drained = self.effects.drain();
        for line in &mut self.lines {
            line.clear_effect();
        }
        drained
    }

    /// Number of pending effects.
    #[must_use]
    pub fn pending_effects(&self) -> usize {
        self.effects.len()
    }

    // -- Apply --------------------------------------------------------------

    /// Apply one change: mutate the lines, move the caret, record history,
    /// queue effects.
    ///
    /// Boundary no-ops return [`EffectDelta::NONE`] without touching history.
    ///
    /// # Panics
    ///
    /// Panics if the change's positions are out of bounds — stale positions
    /// are a broken caller contract, not a recoverable condition.
    pub fn apply(&mut self, change: Change) -> EffectDelta {
        match change.origin {
            Origin::Undo => return self.undo(),
            Origin::Redo => return self.redo(),
            _ => {}
        }

        let span = change.sort();
        self.assert_in_bounds(span.from);
        self.assert_in_bounds(span.to);
        if let Origin::DragMove { drop } = change.origin {
            self.assert_in_bounds(drop);
        }
        debug!("apply {:?} at {}", change.origin, span.from);

        let caret_before = self.caret;
        let selection_before = self.selection;
        let pre_lines = self.line_count();
        let pre_queued = self.effects.len();

        let outcome = if span.is_empty {
            self.apply_at_caret(change, span.from)
        } else {
            self.apply_over_span(change, span)
        };
        let Some((normalized, stale_from, stale_to)) = outcome else {
            trace!("apply was a boundary no-op");
            return EffectDelta::NONE;
        };

        let record = HistoryRecord {
            change: normalized,
            had_selection: !span.is_empty,
            caret_before: Some(caret_before),
            selection_before,
            caret_after: Some(self.caret),
            selection_after: self.selection,
        };
        self.history.push(record);
        self.finish_delta(pre_lines, pre_queued, stale_from, stale_to)
    }

    /// Stale-range bookkeeping shared by apply, undo, and redo: when the
    /// line count changed, every pre-edit line from the edit point to the
    /// old end shifted and is stale.
    fn finish_delta(
        &self,
        pre_lines: usize,
        pre_queued: usize,
        stale_from: usize,
        stale_to: usize,
    ) -> EffectDelta {
        let stale_to = if self.line_count() == pre_lines {
            stale_to
        } else {
            stale_to.max(pre_lines - 1)
        };
        EffectDelta {
            stale_lines: Some((stale_from, stale_to)),
            queued: self.effects.len().saturating_sub(pre_queued),
        }
    }

    fn assert_in_bounds(&self, pos: Position) {
        assert!(
            pos.line < self.line_count(),
            "position {pos} out of bounds ({} lines)",
            self.line_count(),
        );
        assert!(
            pos.effective_col() <= self.line_len(pos.line),
            "position {pos} out of bounds on line {} ({} chars)",
            pos.line,
            self.line_len(pos.line),
        );
    }

    // -- Collapsed-span operations ------------------------------------------

    /// Dispatch a change whose span is collapsed to a caret. Returns the
    /// normalized change to record plus the stale pre-edit line range, or
    /// `None` for a boundary no-op.
    fn apply_at_caret(
        &mut self,
        change: Change,
        at: Position,
    ) -> Option<(Change, usize, usize)> {
        let l = at.line;
        let c = at.effective_col();
        let point = Position::before(l, c);

        match change.origin {
            Origin::InsertText | Origin::ComposeText | Origin::Paste => {
                let fragments = change.inserted;
                if fragments.iter().all(String::is_empty) && fragments.len() <= 1 {
                    return None;
                }
                self.exec_replace(point, point, &fragments);
                self.caret = end_of_fragments(point, &fragments);
                self.selection = None;
                Some((Change::new(point, point, change.origin, fragments), l, l))
            }
            Origin::SplitLine => {
                let fragments = vec![String::new(), String::new()];
                self.exec_replace(point, point, &fragments);
                self.caret = Position::before(l + 1, 0);
                self.selection = None;
                Some((Change::new(point, point, Origin::SplitLine, fragments), l, l))
            }
            Origin::DeleteBackward => {
                if c > 0 {
                    let from = Position::before(l, c - 1);
                    let removed = vec![self.lines[l].slice(c - 1, c).to_string()];
                    self.exec_replace(from, point, &[]);
                    self.caret = from;
                    self.selection = None;
                    let rec = Change::new(from, point, Origin::DeleteBackward, vec![])
                        .with_removed(removed);
                    Some((rec, l, l))
                } else if l == 0 {
                    None
                } else {
                    // Join onto the previous line.
                    let from = Position::before(l - 1, self.line_len(l - 1));
                    let to = Position::before(l, 0);
                    self.exec_replace(from, to, &[]);
                    self.caret = from;
                    self.selection = None;
                    let rec = Change::new(from, to, Origin::DeleteBackward, vec![])
                        .with_removed(vec![String::new(), String::new()]);
                    Some((rec, l - 1, l))
                }
            }
            Origin::DeleteForward => {
                let len = self.line_len(l);
                if c < len {
                    let to = Position::before(l, c + 1);
                    let removed = vec![self.lines[l].slice(c, c + 1).to_string()];
                    self.exec_replace(point, to, &[]);
                    self.caret = point;
                    self.selection = None;
                    let rec = Change::new(point, to, Origin::DeleteForward, vec![])
                        .with_removed(removed);
                    Some((rec, l, l))
                } else if l == self.last_line_index() {
                    None
                } else {
                    // Join the next line onto this one.
                    let to = Position::before(l + 1, 0);
                    self.exec_replace(point, to, &[]);
                    self.caret = point;
                    self.selection = None;
                    let rec = Change::new(point, to, Origin::DeleteForward, vec![])
                        .with_removed(vec![String::new(), String::new()]);
                    Some((rec, l, l + 1))
                }
            }
            Origin::Indent => {
                let fragments = vec![INDENT_UNIT.to_string()];
                self.exec_replace(point, point, &fragments);
                self.caret = end_of_fragments(point, &fragments);
                self.selection = None;
                Some((Change::new(point, point, Origin::Indent, fragments), l, l))
            }
            Origin::Unindent => {
                let prefix = match change.removed.and_then(|mut r| r.pop()) {
                    Some(p) if !p.is_empty() => p,
                    _ => self.lines[l].unindent_prefix().to_string(),
                };
                if prefix.is_empty() {
                    return None;
                }
                let width = prefix.chars().count();
                self.exec_unindent(l, &[prefix.clone()]);
                self.caret = Position::before(l, c.saturating_sub(width));
                self.selection = None;
                let rec = Change::new(point, point, Origin::Unindent, vec![])
                    .with_removed(vec![prefix]);
                Some((rec, l, l))
            }
            Origin::Cut => self.cut_line(l),
            Origin::DragMove { .. } => None,
            Origin::Undo | Origin::Redo => unreachable!("routed before dispatch"),
        }
    }

    /// Cut the whole caret line. The removed fragments span the line plus
    /// one adjacent line break, so the standard delete inverse restores it.
    fn cut_line(&mut self, l: usize) -> Option<(Change, usize, usize)> {
        let text = self.lines[l].text().to_string();
        if self.line_count() == 1 {
            if text.is_empty() {
                return None;
            }
            let from = Position::before(0, 0);
            let to = Position::before(0, self.line_len(0));
            self.exec_delete_line(0);
            self.caret = from;
            self.selection = None;
            let rec = Change::new(from, to, Origin::Cut, vec![]).with_removed(vec![text]);
            Some((rec, 0, 0))
        } else if l == self.last_line_index() {
            // The trailing line break belongs to the previous line.
            let from = Position::before(l - 1, self.line_len(l - 1));
            let to = Position::before(l, self.line_len(l));
            self.exec_delete_line(l);
            self.caret = from;
            self.selection = None;
            let rec = Change::new(from, to, Origin::Cut, vec![])
                .with_removed(vec![String::new(), text]);
            Some((rec, l - 1, l))
        } else {
            let from = Position::before(l, 0);
            let to = Position::before(l + 1, 0);
            self.exec_delete_line(l);
            self.caret = from;
            self.selection = None;
            let rec = Change::new(from, to, Origin::Cut, vec![])
                .with_removed(vec![text, String::new()]);
            Some((rec, l, l + 1))
        }
    }

    // -- Ranged operations --------------------------------------------------

    /// Dispatch a change over a non-empty span.
    fn apply_over_span(
        &mut self,
        change: Change,
        span: SortedSpan,
    ) -> Option<(Change, usize, usize)> {
        let (fl, tl) = (span.from.line, span.to.line);

        match change.origin {
            Origin::DeleteBackward | Origin::DeleteForward | Origin::Cut => {
                let removed = self.span_fragments(span.from, span.to);
                self.exec_replace(span.from, span.to, &[]);
                self.caret = canon(span.from);
                self.selection = None;
                let rec = Change::new(span.from, span.to, change.origin, vec![])
                    .with_removed(removed);
                Some((rec, fl, tl))
            }
            Origin::InsertText | Origin::ComposeText | Origin::Paste | Origin::SplitLine => {
                let fragments = if change.origin == Origin::SplitLine {
                    vec![String::new(), String::new()]
                } else {
                    change.inserted
                };
                let removed = self.span_fragments(span.from, span.to);
                self.exec_replace(span.from, span.to, &fragments);
                self.caret = end_of_fragments(canon(span.from), &fragments);
                self.selection = None;
                let rec = Change::new(span.from, span.to, change.origin, fragments)
                    .with_removed(removed);
                Some((rec, fl, tl))
            }
            Origin::Indent => {
                let units = vec![INDENT_UNIT.to_string(); tl - fl + 1];
                self.exec_prefix_insert(fl, &units);
                let width = INDENT_UNIT.chars().count();
                let anchor = Position::before(fl, span.from.effective_col() + width);
                let head = Position::before(tl, span.to.effective_col() + width);
                self.caret = head;
                self.selection = Some(Selection::new(anchor, head));
                Some((Change::new(span.from, span.to, Origin::Indent, units), fl, tl))
            }
            Origin::Unindent => {
                let prefixes = match change.removed {
                    Some(p) if p.len() == tl - fl + 1 => p,
                    _ => (fl..=tl)
                        .map(|i| self.lines[i].unindent_prefix().to_string())
                        .collect(),
                };
                if prefixes.iter().all(String::is_empty) {
                    return None;
                }
                self.exec_unindent(fl, &prefixes);
                let shift = |pos: Position, idx: usize| {
                    let width = prefixes[idx].chars().count();
                    Position::before(pos.line, pos.effective_col().saturating_sub(width))
                };
                let anchor = shift(span.from, 0);
                let head = shift(span.to, tl - fl);
                self.caret = head;
                self.selection = Some(Selection::new(anchor, head));
                let rec = Change::new(span.from, span.to, Origin::Unindent, vec![])
                    .with_removed(prefixes);
                Some((rec, fl, tl))
            }
            Origin::DragMove { drop } => {
                // Dropping back inside the dragged text changes nothing.
                if Selection::new(span.from, span.to).contains(drop) {
                    return None;
                }
                let fragments = self.span_fragments(span.from, span.to);
                let landed = self.exec_drag(span.from, span.to, drop, &fragments);
                self.caret = end_of_fragments(landed, &fragments);
                self.selection = Some(Selection::new(landed, self.caret));
                let rec = Change::new(
                    span.from,
                    span.to,
                    Origin::DragMove { drop },
                    fragments,
                );
                Some((rec, fl.min(drop.line), tl.max(drop.line)))
            }
            Origin::Undo | Origin::Redo => unreachable!("routed before dispatch"),
        }
    }

    // -- Undo / redo --------------------------------------------------------

    /// Undo the most recent undo step: re-derive the inverse edit from the
    /// recorded change and restore the pre-edit caret and selection.
    pub fn undo(&mut self) -> EffectDelta {
        let Some(record) = self.history.pop_undo() else {
            return EffectDelta::NONE;
        };
        debug!("undo {:?}", record.change.origin);
        let pre_lines = self.line_count();
        let pre_queued = self.effects.len();

        let (stale_from, stale_to) = self.apply_inverse(&record);
        if let Some(caret) = record.caret_before {
            self.caret = caret;
        }
        self.selection = record.selection_before;

        let delta = self.finish_delta(pre_lines, pre_queued, stale_from, stale_to);
        self.history.stash_redo(record);
        delta
    }

    /// Re-apply the most recently undone step and restore its post-edit
    /// caret and selection.
    pub fn redo(&mut self) -> EffectDelta {
        let Some(record) = self.history.pop_redo() else {
            return EffectDelta::NONE;
        };
        debug!("redo {:?}", record.change.origin);
        let pre_lines = self.line_count();
        let pre_queued = self.effects.len();

        let (stale_from, stale_to) = self.apply_forward_record(&record);
        if let Some(caret) = record.caret_after {
            self.caret = caret;
        }
        self.selection = record.selection_after;

        let delta = self.finish_delta(pre_lines, pre_queued, stale_from, stale_to);
        self.history.restore_undone(record);
        delta
    }

    /// Execute the inverse of a recorded change. Returns the stale pre-edit
    /// line range.
    fn apply_inverse(&mut self, record: &HistoryRecord) -> (usize, usize) {
        let change = &record.change;
        let span = change.sort();
        match change.origin {
            // Deletes collapse to a point; pasting the removed fragments
            // back at that point restores the text.
            Origin::DeleteBackward | Origin::DeleteForward | Origin::Cut => {
                let point = record.caret_after.map_or(span.from, canon);
                let fragments = change.removed.clone().unwrap_or_default();
                self.exec_replace(point, point, &fragments);
                let end = end_of_fragments(point, &fragments);
                (point.line, end.line)
            }
            // Inserts are undone by replacing what they produced with what
            // they removed.
            Origin::InsertText | Origin::ComposeText | Origin::Paste | Origin::SplitLine => {
                let from = canon(span.from);
                let end = end_of_fragments(from, &change.inserted);
                let fragments = change.removed.clone().unwrap_or_default();
                self.exec_replace(from, end, &fragments);
                (from.line, end.line)
            }
            Origin::Indent => {
                if record.had_selection {
                    self.exec_unindent(span.from.line, &change.inserted);
                    (span.from.line, span.from.line + change.inserted.len() - 1)
                } else {
                    let from = canon(span.from);
                    let end = end_of_fragments(from, &change.inserted);
                    self.exec_replace(from, end, &[]);
                    (from.line, end.line)
                }
            }
            Origin::Unindent => {
                let prefixes = change.removed.clone().unwrap_or_default();
                let last = span.from.line + prefixes.len().max(1) - 1;
                self.exec_prefix_insert(span.from.line, &prefixes);
                (span.from.line, last)
            }
            Origin::DragMove { drop } => {
                let landed = map_after_removal(drop, span.from, span.to);
                let end = end_of_fragments(landed, &change.inserted);
                self.exec_replace(landed, end, &[]);
                self.exec_replace(canon(span.from), canon(span.from), &change.inserted);
                (
                    span.from.line.min(landed.line),
                    span.to.line.max(drop.line),
                )
            }
            Origin::Undo | Origin::Redo => unreachable!("never recorded"),
        }
    }

    /// Re-execute a recorded change exactly. Returns the stale pre-edit
    /// line range.
    fn apply_forward_record(&mut self, record: &HistoryRecord) -> (usize, usize) {
        let change = &record.change;
        let span = change.sort();
        match change.origin {
            Origin::DeleteBackward | Origin::DeleteForward | Origin::Cut => {
                let point = record.caret_after.map_or(span.from, canon);
                let fragments = change.removed.clone().unwrap_or_default();
                let end = end_of_fragments(point, &fragments);
                self.exec_replace(point, end, &[]);
                (point.line, end.line)
            }
            Origin::InsertText | Origin::ComposeText | Origin::Paste | Origin::SplitLine => {
                self.exec_replace(span.from, span.to, &change.inserted);
                (span.from.line, span.to.line)
            }
            Origin::Indent => {
                if record.had_selection {
                    self.exec_prefix_insert(span.from.line, &change.inserted);
                    (span.from.line, span.from.line + change.inserted.len() - 1)
                } else {
                    self.exec_replace(span.from, span.to, &change.inserted);
                    (span.from.line, span.to.line)
                }
            }
            Origin::Unindent => {
                let prefixes = change.removed.clone().unwrap_or_default();
                let last = span.from.line + prefixes.len().max(1) - 1;
                self.exec_unindent(span.from.line, &prefixes);
                (span.from.line, last)
            }
            Origin::DragMove { drop } => {
                let landed = self.exec_drag(span.from, span.to, drop, &change.inserted);
                (
                    span.from.line.min(landed.line),
                    span.to.line.max(drop.line),
                )
            }
            Origin::Undo | Origin::Redo => unreachable!("never recorded"),
        }
    }

    // -- Executors ----------------------------------------------------------

    /// The fragments of text spanning `[from, to)`.
    fn span_fragments(&self, from: Position, to: Position) -> Vec<String> {
        let (fl, fc) = (from.line, from.effective_col());
        let (tl, tc) = (to.line, to.effective_col());
        if fl == tl {
            return vec![self.lines[fl].slice(fc, tc).to_string()];
        }
        let mut fragments = Vec::with_capacity(tl - fl + 1);
        fragments.push(self.lines[fl].tail(fc).to_string());
        for line in &self.lines[fl + 1..tl] {
            fragments.push(line.text().to_string());
        }
        fragments.push(self.lines[tl].head(tc).to_string());
        fragments
    }

    /// The general splice: replace `[from, to)` with `fragments`, reusing
    /// the overlapping lines in place, deleting or inserting the rest, and
    /// tagging every touched line.
    fn exec_replace(&mut self, from: Position, to: Position, fragments: &[String]) {
        let (fl, fc) = (from.line, from.effective_col());
        let (tl, tc) = (to.line, to.effective_col());
        trace!("replace {from}..{to} with {} fragment(s)", fragments.len());

        let head = self.lines[fl].head(fc).to_string();
        let tail = self.lines[tl].tail(tc).to_string();

        let mut region: Vec<String> = if fragments.is_empty() {
            vec![String::new()]
        } else {
            fragments.to_vec()
        };
        region[0].insert_str(0, &head);
        let last = region.len() - 1;
        region[last].push_str(&tail);

        let old_count = tl - fl + 1;
        let new_count = region.len();
        let shared = old_count.min(new_count);

        let extra = region.split_off(shared);
        for (i, text) in region.into_iter().enumerate() {
            self.lines[fl + i].replace_text(text);
            self.tag(fl + i, EffectKind::Updated);
        }
        if new_count < old_count {
            for line in self.lines.drain(fl + new_count..=tl) {
                self.effects.push(line.id(), EffectKind::Deleted);
            }
        } else {
            for (i, text) in extra.into_iter().enumerate() {
                let line = self.alloc_line(text);
                self.lines.insert(fl + shared + i, line);
                self.tag(fl + shared + i, EffectKind::Inserted);
            }
        }
    }

    /// Insert a per-line prefix at column 0, starting at `from_line`.
    /// Empty prefixes skip their line.
    fn exec_prefix_insert(&mut self, from_line: usize, prefixes: &[String]) {
        for (i, prefix) in prefixes.iter().enumerate() {
            if prefix.is_empty() {
                continue;
            }
            self.lines[from_line + i].insert_at(0, prefix);
            self.tag(from_line + i, EffectKind::Updated);
        }
    }

    /// Strip a per-line prefix from column 0, starting at `from_line`.
    ///
    /// # Panics
    ///
    /// Panics if a non-empty prefix does not match the line's leading text.
    fn exec_unindent(&mut self, from_line: usize, prefixes: &[String]) {
        for (i, prefix) in prefixes.iter().enumerate() {
            if prefix.is_empty() {
                continue;
            }
            let idx = from_line + i;
            assert!(
                self.lines[idx].text().starts_with(prefix.as_str()),
                "line {idx} does not start with recorded indent prefix",
            );
            self.lines[idx].remove_range(0, prefix.chars().count());
            self.tag(idx, EffectKind::Updated);
        }
    }

    /// Remove a whole line. The last remaining line is blanked instead so
    /// the document never becomes empty.
    fn exec_delete_line(&mut self, index: usize) {
        if self.line_count() == 1 {
            self.lines[index].replace_text(String::new());
            self.tag(index, EffectKind::Updated);
        } else {
            let line = self.lines.remove(index);
            self.effects.push(line.id(), EffectKind::Deleted);
        }
    }

    /// Move the text in `[from, to)` to `drop`: remove it, remap the drop
    /// target into post-removal coordinates, and re-insert. Returns where
    /// the moved text landed.
    fn exec_drag(
        &mut self,
        from: Position,
        to: Position,
        drop: Position,
        fragments: &[String],
    ) -> Position {
        self.exec_replace(from, to, &[]);
        let landed = map_after_removal(drop, from, to);
        self.exec_replace(landed, landed, fragments);
        landed
    }

    fn tag(&mut self, index: usize, kind: EffectKind) {
        let id = self.lines[index].id();
        let resolved = self.effects.push(id, kind);
        self.lines[index].set_effect(resolved);
    }
}

// ---------------------------------------------------------------------------
// Position helpers
// ---------------------------------------------------------------------------

/// Canonical form of a position: `Before` affinity at the effective column.
fn canon(pos: Position) -> Position {
    Position::before(pos.line, pos.effective_col())
}

/// Where `pos` ends up after the text in `[from, to)` is removed. `pos`
/// must lie outside the removed span.
fn map_after_removal(pos: Position, from: Position, to: Position) -> Position {
    if pos.compare(from) != Ordering::Greater {
        return canon(pos);
    }
    if pos.line == to.line {
        let col = from.effective_col() + (pos.effective_col() - to.effective_col());
        Position::before(from.line, col)
    } else {
        Position::before(pos.line - (to.line - from.line), pos.effective_col())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
