//! Undo/redo history with operation coalescing.
//!
//! Two stacks of [`HistoryRecord`]s. Each record is one undoable unit: the
//! applied [`Change`] plus caret/selection snapshots from before and after
//! the edit. Undo restores the before-snapshots, redo the after-snapshots —
//! the text motion itself is re-derived from the change by the document.
//!
//! # Coalescing
//!
//! Runs of compatible zero-width edits merge into the top record instead of
//! pushing a new one:
//!
//! - typing (`InsertText`), backspace, and forward delete each coalesce with
//!   themselves while no selection intervenes — typing `"abc"` is one undo
//!   step;
//! - an IME session (`ComposeText`) *overwrites* the top record on every
//!   update, collapsing the whole composition into one step;
//! - any edit over a non-empty selection always gets its own record and is
//!   never merged into.
//!
//! Moving the caret, changing the selection, or an undo/redo breaks the
//! current run — later edits never merge into a record they are not
//! contiguous with.

use log::trace;

use crate::change::{Change, Origin, concat_fragments};
use crate::position::Position;
use crate::selection::Selection;

// ---------------------------------------------------------------------------
// HistoryRecord
// ---------------------------------------------------------------------------

/// A change enriched with enough metadata to compute its exact inverse.
///
/// The before-snapshots restore caret and selection on undo (this is what
/// makes drag-move restore the pre-drag selection verbatim); the
/// after-snapshots restore them on redo without re-deriving the caret
/// placement rules.
#[derive(Debug, Clone)]
pub struct HistoryRecord {
    pub change: Change,
    /// True when the edit replaced a non-empty selection.
    pub had_selection: bool,
    pub caret_before: Option<Position>,
    pub selection_before: Option<Selection>,
    pub caret_after: Option<Position>,
    pub selection_after: Option<Selection>,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Undo/redo stacks plus the coalescing state.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<HistoryRecord>,
    redo_stack: Vec<HistoryRecord>,
    /// Origin of the previous push, for run detection.
    last_origin: Option<Origin>,
    /// Whether the previous push was a selection edit (never merged into).
    last_was_selection: bool,
}

impl History {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            last_origin: None,
            last_was_selection: false,
        }
    }

    /// Record an applied change. New edits invalidate the redo stack.
    pub fn push(&mut self, record: HistoryRecord) {
        self.redo_stack.clear();
        let origin = record.change.origin;

        // An IME session overwrites the top record: the first compose of the
        // session keeps its span and before-snapshots, later composes only
        // swap in the latest text and after-state.
        if origin.same_kind(Origin::ComposeText)
            && self.last_origin.is_some_and(|o| o.same_kind(origin))
        {
            if let Some(top) = self.undo_stack.last_mut() {
                if top.change.origin.same_kind(Origin::ComposeText) {
                    trace!("history: compose overwrite at {}", top.change.from);
                    top.change.inserted = record.change.inserted;
                    top.caret_after = record.caret_after;
                    top.selection_after = record.selection_after;
                    self.last_origin = Some(origin);
                    self.last_was_selection = false;
                    return;
                }
            }
        }

        // Merge eligibility keys off `had_selection`, not the recorded span:
        // a plain backspace records the one-character span it removed yet
        // still coalesces with its run.
        let same_run = self.last_origin.is_some_and(|o| o.same_kind(origin));
        if !record.had_selection && same_run && origin.is_mergeable() && !self.last_was_selection {
            if let Some(top) = self.undo_stack.last_mut() {
                if Self::continues(top, &record) {
                    trace!("history: merging {origin:?} into top record");
                    Self::merge(top, record, origin);
                    self.last_origin = Some(origin);
                    self.last_was_selection = false;
                    return;
                }
            }
        }

        self.last_origin = Some(origin);
        self.last_was_selection = record.had_selection;
        self.undo_stack.push(record);
    }

    /// True when `record` picks up exactly where `top` left the caret.
    /// Guards merging against out-of-band edits: two inserts at unrelated
    /// positions share an origin but are separate undo steps.
    fn continues(top: &HistoryRecord, record: &HistoryRecord) -> bool {
        let Some(prev) = top.caret_after else {
            return false;
        };
        let span = record.change.sort();
        // A backspace eats leftward, so its span *ends* at the caret.
        let point = match record.change.origin {
            Origin::DeleteBackward => span.to,
            _ => span.from,
        };
        point.equal_caret(prev)
    }

    /// Fold `record` into `top` for a mergeable zero-width run.
    fn merge(top: &mut HistoryRecord, record: HistoryRecord, origin: Origin) {
        match origin {
            Origin::InsertText => {
                let prev = std::mem::take(&mut top.change.inserted);
                top.change.inserted = concat_fragments(prev, record.change.inserted);
            }
            Origin::DeleteBackward => {
                // New text precedes the old in document order.
                let old = top.change.removed.take().unwrap_or_default();
                let new = record.change.removed.unwrap_or_default();
                top.change.removed = Some(concat_fragments(new, old));
            }
            Origin::DeleteForward => {
                let old = top.change.removed.take().unwrap_or_default();
                let new = record.change.removed.unwrap_or_default();
                top.change.removed = Some(concat_fragments(old, new));
            }
            _ => unreachable!("only mergeable origins coalesce"),
        }
        top.caret_after = record.caret_after;
        top.selection_after = record.selection_after;
    }

    /// Pop the record to undo. Breaks the coalescing run.
    pub fn pop_undo(&mut self) -> Option<HistoryRecord> {
        self.break_run();
        self.undo_stack.pop()
    }

    /// Pop the record to redo. Breaks the coalescing run.
    pub fn pop_redo(&mut self) -> Option<HistoryRecord> {
        self.break_run();
        self.redo_stack.pop()
    }

    /// Park an undone record on the redo stack.
    pub fn stash_redo(&mut self, record: HistoryRecord) {
        self.redo_stack.push(record);
    }

    /// Put a redone record back on the undo stack, without the
    /// redo-invalidation a fresh push would do.
    pub fn restore_undone(&mut self, record: HistoryRecord) {
        self.undo_stack.push(record);
    }

    /// Forget the current coalescing run: the next mergeable edit starts a
    /// new record. Called on caret or selection movement.
    pub const fn break_run(&mut self) {
        self.last_origin = None;
        self.last_was_selection = false;
    }

    /// Drop all history. Used when the document is wholesale reset.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.break_run();
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
