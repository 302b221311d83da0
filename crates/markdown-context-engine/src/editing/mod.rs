/*!
 * # Editing
 *
 * Everything that changes a document goes through here.
 *
 * - **`replace`**: expected-text guarded replacements compiled to one
 *   `xi_rope::Delta` per request. Batches are all or nothing.
 * - **`edits`**: builders that turn detected contexts into replacements, so
 *   callers never compute offsets by hand.
 * - **`editor`**: the `Editor` session owning the rope buffer, selection and
 *   version counter.
 * - **`patch`**: what an applied edit changed.
 *
 * ```rust
 * use markdown_context_engine::editing::{Editor, edits};
 * use markdown_context_engine::Context;
 *
 * let mut editor = Editor::from_text("- [ ] Write docs\n");
 * editor.set_selection(8, 8);
 *
 * let contexts = editor.get_contexts_at_cursor();
 * let Some(Context::Checkbox(checkbox)) = contexts.last() else {
 *     panic!("expected a checkbox");
 * };
 * let toggle = edits::toggle_checkbox(checkbox).unwrap();
 * assert!(editor.apply_replacement(&toggle).is_ok());
 * assert_eq!(editor.text(), "- [x] Write docs\n");
 * ```
 */

pub mod editor;
pub mod edits;
pub mod patch;
pub mod replace;

pub use editor::Editor;
pub use edits::EditError;
pub use patch::Patch;
pub use replace::{ReplaceError, Replacement, apply_to_text, compile_batch, compile_replacement};
