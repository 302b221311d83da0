use xi_rope::delta::Transformer;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::context::Context;
use crate::detect::{Selection, Snapshot, clamp_offset};
use crate::editing::patch::{Patch, changed_ranges};
use crate::editing::replace::{ReplaceError, Replacement, compile_batch};

/// One open document: the rope buffer, the current selection and a version
/// counter that moves on every successful edit.
///
/// The parse tree is not stored. Every detection call parses the current
/// buffer, so a context can never be computed from a stale tree.
#[derive(Debug, Clone)]
pub struct Editor {
    buffer: Rope,
    selection: Selection,
    version: u64,
    scroll_target: Option<usize>,
}

impl Editor {
    pub fn from_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            selection: Selection::default(),
            version: 0,
            scroll_target: None,
        }
    }

    /// Create an editor from file bytes, which must be UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(text))
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Offset last requested by [`Editor::scroll_to_position`].
    pub fn scroll_target(&self) -> Option<usize> {
        self.scroll_target
    }

    /// Store a selection as given. It is clamped when next used.
    pub fn set_selection(&mut self, anchor: usize, head: usize) {
        self.selection = Selection::new(anchor, head);
    }

    /// Contexts for the current selection against the current text.
    pub fn get_contexts_at_cursor(&mut self) -> Vec<Context> {
        let text = self.text();
        self.selection = self.selection.clamped(&text);

        let tree = markdown_context_syntax::parse(&text);
        Snapshot::new(&text, &tree).contexts(self.selection)
    }

    /// Apply one replacement as a single edit.
    pub fn apply_replacement(&mut self, replacement: &Replacement) -> Result<Patch, ReplaceError> {
        self.apply_batch(std::slice::from_ref(replacement))
    }

    /// Apply a batch as a single edit, or nothing at all.
    pub fn apply_batch(&mut self, entries: &[Replacement]) -> Result<Patch, ReplaceError> {
        let text = self.text();
        let delta = compile_batch(&text, entries)?;
        Ok(self.apply_delta(&delta))
    }

    fn apply_delta(&mut self, delta: &Delta<RopeInfo>) -> Patch {
        self.buffer = delta.apply(&self.buffer);
        self.selection = Selection::new(
            transform_offset(delta, self.selection.anchor),
            transform_offset(delta, self.selection.head),
        );
        self.version += 1;

        Patch {
            changed: changed_ranges(delta),
            new_selection: self.selection,
            version: self.version,
        }
    }

    /// Replace `from..to`, only if it still reads `expected` when given.
    ///
    /// Returns `false` and leaves the document untouched on any failure.
    pub fn replace_range(
        &mut self,
        text: &str,
        from: usize,
        to: usize,
        expected: Option<&str>,
    ) -> bool {
        let mut replacement = Replacement::new(from, to, text);
        replacement.expected_text = expected.map(str::to_string);

        match self.apply_replacement(&replacement) {
            Ok(_) => true,
            Err(err) => {
                log::warn!("replace {from}..{to} rejected: {err}");
                false
            }
        }
    }

    /// Apply every entry against the current text, or none of them.
    pub fn batch_replace(&mut self, entries: &[Replacement]) -> bool {
        match self.apply_batch(entries) {
            Ok(_) => true,
            Err(err) => {
                log::warn!("batch of {} replacements rejected: {err}", entries.len());
                false
            }
        }
    }

    /// Collapse the selection onto `pos` and remember it as the scroll target.
    pub fn scroll_to_position(&mut self, pos: usize) {
        let pos = clamp_offset(&self.text(), pos);
        self.selection = Selection::cursor(pos);
        self.scroll_target = Some(pos);
    }
}

/// Where `offset` lands after `delta`, staying after text inserted at it.
fn transform_offset(delta: &Delta<RopeInfo>, offset: usize) -> usize {
    // A transformer only accepts non-decreasing offsets, so use one per call
    Transformer::new(delta).transform(offset, true)
}
