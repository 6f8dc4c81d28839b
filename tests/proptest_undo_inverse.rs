//! Property tests for the history laws.
//!
//! Whatever the edit, undo must return the document — text, caret, and
//! selection — to its exact prior state, and redo must replay the undone
//! edit to its exact posterior state. Operations are generated against the
//! document's current shape so every position is in bounds.

use editcore::{Change, Document, Origin, Position, split_fragments};
use proptest::prelude::*;
use proptest::sample::Index;

fn arb_text() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z ]{0,8}", 1..4).prop_map(|lines| lines.join("\n"))
}

fn arb_payload() -> impl Strategy<Value = String> {
    "[a-z \n]{0,10}"
}

#[derive(Debug, Clone)]
struct EditOp {
    kind: u8,
    a: (Index, Index),
    b: (Index, Index),
    c: (Index, Index),
    payload: String,
}

fn arb_op() -> impl Strategy<Value = EditOp> {
    (
        0u8..9,
        (any::<Index>(), any::<Index>()),
        (any::<Index>(), any::<Index>()),
        (any::<Index>(), any::<Index>()),
        arb_payload(),
    )
        .prop_map(|(kind, a, b, c, payload)| EditOp {
            kind,
            a,
            b,
            c,
            payload,
        })
}

/// Map an index pair onto a valid position in `doc`.
fn position(doc: &Document, (li, ci): &(Index, Index)) -> Position {
    let line = li.index(doc.line_count());
    let col = ci.index(doc.line_len(line) + 1);
    Position::before(line, col)
}

fn build_change(doc: &Document, op: &EditOp) -> Change {
    let p = position(doc, &op.a);
    let q = position(doc, &op.b);
    match op.kind {
        0 => Change::new(p, p, Origin::InsertText, split_fragments(&op.payload)),
        1 => Change::new(p, q, Origin::Paste, split_fragments(&op.payload)),
        2 => Change::new(p, q, Origin::DeleteBackward, vec![]),
        3 => Change::new(p, q, Origin::DeleteForward, vec![]),
        4 => Change::new(p, p, Origin::SplitLine, vec![]),
        5 => Change::new(p, q, Origin::Indent, vec![]),
        6 => Change::new(p, q, Origin::Unindent, vec![]),
        7 => Change::new(p, p, Origin::Cut, vec![]),
        8 => Change::new(
            p,
            q,
            Origin::DragMove {
                drop: position(doc, &op.c),
            },
            vec![],
        ),
        _ => unreachable!(),
    }
}

proptest! {
    #[test]
    fn undo_restores_the_previous_document(text in arb_text(), op in arb_op()) {
        let mut doc = Document::from_text(&text);
        let before_text = doc.full_text();
        let before_caret = doc.caret();
        let before_selection = doc.selection();

        let change = build_change(&doc, &op);
        let delta = doc.apply(change);

        if delta.is_noop() {
            prop_assert_eq!(doc.full_text(), before_text);
        } else {
            doc.undo();
            prop_assert_eq!(doc.full_text(), before_text);
            prop_assert_eq!(doc.caret(), before_caret);
            prop_assert_eq!(doc.selection(), before_selection);
        }
    }

    #[test]
    fn redo_replays_the_undone_edit(text in arb_text(), op in arb_op()) {
        let mut doc = Document::from_text(&text);
        let change = build_change(&doc, &op);
        let delta = doc.apply(change);
        prop_assume!(!delta.is_noop());

        let after_text = doc.full_text();
        let after_caret = doc.caret();
        let after_selection = doc.selection();

        doc.undo();
        doc.redo();

        prop_assert_eq!(doc.full_text(), after_text);
        prop_assert_eq!(doc.caret(), after_caret);
        prop_assert_eq!(doc.selection(), after_selection);
    }

    #[test]
    fn full_undo_unwinds_any_edit_sequence(
        text in arb_text(),
        ops in proptest::collection::vec(arb_op(), 1..6),
    ) {
        let mut doc = Document::from_text(&text);
        let original = doc.full_text();

        for op in &ops {
            let change = build_change(&doc, op);
            doc.apply(change);
        }
        let final_text = doc.full_text();

        while doc.can_undo() {
            doc.undo();
        }
        prop_assert_eq!(doc.full_text(), original);
        prop_assert_eq!(doc.caret(), Position::ZERO);
        prop_assert_eq!(doc.selection(), None);

        while doc.can_redo() {
            doc.redo();
        }
        prop_assert_eq!(doc.full_text(), final_text);
    }
}
