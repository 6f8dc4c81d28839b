//! In-memory document model for a line-oriented text editor.
//!
//! The model is the part of an editor that knows nothing about pixels: lines
//! of text, a caret, a selection, and a history of edits. Everything an
//! editing surface does — typing, IME composition, Enter, Backspace, Tab,
//! cut/paste, drag-and-drop, undo/redo — is expressed as a [`Change`] and
//! funneled through [`Document::apply`].
//!
//! All coordinates are 0-indexed and columns count chars, not bytes. Lines
//! carry stable [`LineId`]s so a renderer can key per-line state that
//! survives splices, and every edit queues per-line [`Effect`]s describing
//! exactly what must be redrawn.
//!
//! ```
//! use editcore::{Change, Document, Origin, Position};
//!
//! let mut doc = Document::from_text("hello");
//! let at = Position::before(0, 5);
//! doc.apply(Change::new(at, at, Origin::InsertText, vec![" world".into()]));
//! assert_eq!(doc.full_text(), "hello world");
//!
//! doc.undo();
//! assert_eq!(doc.full_text(), "hello");
//! ```

pub mod change;
pub mod document;
pub mod effect;
pub mod history;
pub mod line;
pub mod position;
pub mod selection;

pub use change::{
    Change, INDENT_UNIT, Origin, concat_fragments, end_of_fragments, join_fragments,
    split_fragments,
};
pub use document::Document;
pub use effect::{Effect, EffectDelta, EffectQueue};
pub use history::{History, HistoryRecord};
pub use line::{EffectKind, Line, LineId};
pub use position::{Position, SortedSpan, Sticky};
pub use selection::Selection;
