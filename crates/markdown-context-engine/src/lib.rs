//! Context detection and guarded editing for Markdown documents.
//!
//! Given a document and a cursor or selection, [`Snapshot::contexts`]
//! reports what the user is pointing at: a link or image, a code span or
//! block, a task checkbox, a footnote reference, or a batch of tasks and
//! links inside a selection. The [`editing`] module turns those contexts into
//! replacements that only apply while the document still reads what the
//! context saw.

pub mod context;
pub mod detect;
pub mod editing;

pub use context::{
    CheckboxContext, CodeContext, Context, ContextKind, FootnoteContext, LinkContext, LinkInfo,
    LinkSelectionContext, LinkType, TaskInfo, TaskSelectionContext,
};
pub use detect::{Selection, Snapshot, detect_contexts};
pub use editing::{EditError, Editor, Patch, ReplaceError, Replacement, edits};
