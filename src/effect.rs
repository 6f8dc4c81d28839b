//! The effect queue — which lines the renderer must resynchronize.
//!
//! Every edit tags the lines it touched and queues them here. The rendering
//! collaborator drains the queue once per cycle and patches exactly those
//! lines instead of re-rendering the document. The queue deduplicates by
//! line identity: re-tagging a queued line moves it to the back of the queue
//! rather than queueing it twice.

use crate::line::{EffectKind, LineId};

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// One pending visual effect: a line and how it changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    pub line: LineId,
    pub kind: EffectKind,
}

// ---------------------------------------------------------------------------
// EffectQueue
// ---------------------------------------------------------------------------

/// FIFO of lines awaiting visual sync, deduplicated by line id.
///
/// Tag resolution when a queued line is tagged again:
/// - anything → `Deleted` becomes `Deleted` (the removal wins);
/// - `Inserted` → `Updated` stays `Inserted` (the line has still never been
///   rendered);
/// - `Deleted` → anything is a programming error and panics: a deleted line
///   must never be tagged again until the renderer consumes the deletion.
#[derive(Debug, Default)]
pub struct EffectQueue {
    queue: Vec<Effect>,
}

impl EffectQueue {
    #[must_use]
    pub const fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queue an effect for `line`, returning the resolved tag.
    ///
    /// # Panics
    ///
    /// Panics if `line` is already queued as `Deleted`.
    pub fn push(&mut self, line: LineId, kind: EffectKind) -> EffectKind {
        let mut kind = kind;
        if let Some(idx) = self.queue.iter().position(|e| e.line == line) {
            let old = self.queue.remove(idx);
            assert!(
                old.kind != EffectKind::Deleted,
                "line {line} tagged {kind:?} after deletion",
            );
            if old.kind == EffectKind::Inserted && kind == EffectKind::Updated {
                kind = EffectKind::Inserted;
            }
        }
        self.queue.push(Effect { line, kind });
        kind
    }

    /// Take every pending effect in queue order, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.queue)
    }

    /// True when `line` has a pending effect.
    #[must_use]
    pub fn contains(&self, line: LineId) -> bool {
        self.queue.iter().any(|e| e.line == line)
    }

    /// The oldest pending effect.
    #[must_use]
    pub fn front(&self) -> Option<Effect> {
        self.queue.first().copied()
    }

    /// The most recently queued effect.
    #[must_use]
    pub fn back(&self) -> Option<Effect> {
        self.queue.last().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

// ---------------------------------------------------------------------------
// EffectDelta
// ---------------------------------------------------------------------------

/// What one `apply`/`undo`/`redo` did to the document's visual state.
///
/// Returned instead of firing a global "something changed" notification so
/// the caller decides scheduling, and so the core is callable from tests
/// without a render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectDelta {
    /// Inclusive pre-edit line range whose cached per-line hit-test
    /// metadata is now stale. `None` when the operation was a no-op.
    pub stale_lines: Option<(usize, usize)>,
    /// Net number of entries the operation added to the effect queue.
    pub queued: usize,
}

impl EffectDelta {
    /// The delta of a silent no-op.
    pub const NONE: Self = Self {
        stale_lines: None,
        queued: 0,
    };

    /// True when the operation changed nothing.
    #[must_use]
    pub const fn is_noop(self) -> bool {
        self.stale_lines.is_none()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const A: LineId = LineId(1);
    const B: LineId = LineId(2);
    const C: LineId = LineId(3);

    #[test]
    fn push_keeps_fifo_order() {
        let mut q = EffectQueue::new();
        q.push(A, EffectKind::Updated);
        q.push(B, EffectKind::Inserted);
        let drained = q.drain();
        assert_eq!(drained[0].line, A);
        assert_eq!(drained[1].line, B);
        assert!(q.is_empty());
    }

    #[test]
    fn repush_moves_to_back() {
        let mut q = EffectQueue::new();
        q.push(A, EffectKind::Updated);
        q.push(B, EffectKind::Updated);
        q.push(A, EffectKind::Updated);
        assert_eq!(q.len(), 2);
        assert_eq!(q.front().unwrap().line, B);
        assert_eq!(q.back().unwrap().line, A);
    }

    #[test]
    fn deleted_supersedes_updated() {
        let mut q = EffectQueue::new();
        q.push(A, EffectKind::Updated);
        let resolved = q.push(A, EffectKind::Deleted);
        assert_eq!(resolved, EffectKind::Deleted);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn inserted_absorbs_updated() {
        let mut q = EffectQueue::new();
        q.push(A, EffectKind::Inserted);
        let resolved = q.push(A, EffectKind::Updated);
        assert_eq!(resolved, EffectKind::Inserted);
        assert_eq!(q.back().unwrap().kind, EffectKind::Inserted);
    }

    #[test]
    #[should_panic(expected = "after deletion")]
    fn tagging_after_deletion_panics() {
        let mut q = EffectQueue::new();
        q.push(A, EffectKind::Deleted);
        q.push(A, EffectKind::Updated);
    }

    #[test]
    fn contains_and_clear() {
        let mut q = EffectQueue::new();
        q.push(C, EffectKind::Updated);
        assert!(q.contains(C));
        assert!(!q.contains(A));
        q.clear();
        assert!(q.is_empty());
    }

    #[test]
    fn drain_empties_the_queue() {
        let mut q = EffectQueue::new();
        q.push(A, EffectKind::Updated);
        assert_eq!(q.drain().len(), 1);
        assert_eq!(q.drain().len(), 0);
    }

    #[test]
    fn noop_delta() {
        assert!(EffectDelta::NONE.is_noop());
        let delta = EffectDelta {
            stale_lines: Some((0, 2)),
            queued: 3,
        };
        assert!(!delta.is_noop());
    }
}
