//! # Context Detection
//!
//! Classifies a cursor position or selection against a parsed document.
//!
//! Detection is a pure function of `(text, tree, selection)`: nothing is
//! cached between calls and the tree is only borrowed for the duration of
//! one call.
//!
//! ## Order of results
//!
//! 1. A non-empty selection is scanned for tasks and external links
//!    ([`selection`]). If either scan finds something, those contexts are the
//!    whole answer.
//! 2. Otherwise the selection head is classified as a single position: one
//!    primary context by priority ([`primary`]), falling back to footnotes,
//!    followed by a checkbox context when the line is a task ([`checkbox`]).
//!
//! ```
//! use markdown_context_engine::{Context, Selection, Snapshot};
//! use markdown_context_syntax::parse;
//!
//! let text = "- [ ] run `cargo test`\n";
//! let tree = parse(text);
//! let contexts = Snapshot::new(text, &tree).contexts(Selection::cursor(12));
//!
//! assert!(matches!(contexts[0], Context::Code(_)));
//! assert!(matches!(contexts[1], Context::Checkbox(_)));
//! ```

pub mod checkbox;
pub mod code;
pub mod footnote;
pub mod link;
pub mod primary;
pub mod references;
pub mod selection;
pub mod url;

use std::ops::Range;

use markdown_context_syntax::{SyntaxKind, SyntaxNode};
use serde::{Deserialize, Serialize};

use crate::context::Context;

/// A selection as anchor (where it started) and head (where the cursor is).
///
/// A collapsed selection (`anchor == head`) is a plain cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn cursor(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// The selected range with its ends in document order.
    pub fn range(&self) -> Range<usize> {
        self.anchor.min(self.head)..self.anchor.max(self.head)
    }

    /// Both ends clamped into `text` and moved back onto char boundaries.
    pub fn clamped(&self, text: &str) -> Self {
        Self::new(clamp_offset(text, self.anchor), clamp_offset(text, self.head))
    }
}

/// Borrowed view of one document snapshot: its text and the tree parsed from it.
#[derive(Clone, Copy)]
pub struct Snapshot<'a> {
    pub text: &'a str,
    pub tree: &'a SyntaxNode,
}

impl<'a> Snapshot<'a> {
    pub fn new(text: &'a str, tree: &'a SyntaxNode) -> Self {
        Self { text, tree }
    }

    /// All contexts for a cursor or selection, in presentation order.
    pub fn contexts(&self, selection: Selection) -> Vec<Context> {
        let selection = selection.clamped(self.text);

        if !selection.is_empty() {
            let found = selection::selection_contexts(self, selection.range());
            if !found.is_empty() {
                return found;
            }
        }

        self.contexts_at(selection.head)
    }

    /// Primary context (if any) followed by the checkbox context (if any).
    pub fn contexts_at(&self, pos: usize) -> Vec<Context> {
        let pos = clamp_offset(self.text, pos);
        let mut contexts = Vec::new();

        if let Some(context) = primary::primary_context(self, pos) {
            contexts.push(context);
        }
        if let Some(checkbox) = checkbox::checkbox_at(self, pos) {
            contexts.push(Context::Checkbox(checkbox));
        }

        contexts
    }

    /// Nodes whose range contains `pos`, ends inclusive, outermost first.
    pub(crate) fn enclosing_nodes(&self, pos: usize) -> Vec<SyntaxNode> {
        self.tree
            .descendants()
            .filter(|node| {
                let span = node_span(node);
                span.start <= pos && pos <= span.end
            })
            .collect()
    }

    /// Nodes of `kinds` that share at least one byte with `range`.
    pub(crate) fn overlapping_nodes<'k>(
        &self,
        range: Range<usize>,
        kinds: &'k [SyntaxKind],
    ) -> impl Iterator<Item = SyntaxNode> + 'k {
        self.tree.descendants().filter(move |node| {
            let span = node_span(node);
            kinds.contains(&node.kind()) && span.start < range.end && span.end > range.start
        })
    }
}

/// Convenience for callers holding just the text and the tree.
pub fn detect_contexts(text: &str, tree: &SyntaxNode, selection: Selection) -> Vec<Context> {
    Snapshot::new(text, tree).contexts(selection)
}

pub(crate) fn node_span(node: &SyntaxNode) -> Range<usize> {
    let text_range = node.text_range();
    (text_range.start().into())..(text_range.end().into())
}

/// Span of the line containing `pos`, without its line ending.
pub(crate) fn line_span(text: &str, pos: usize) -> Range<usize> {
    let start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
    let end = text[pos..].find('\n').map_or(text.len(), |i| pos + i);
    let end = if text[start..end].ends_with('\r') {
        end - 1
    } else {
        end
    };
    start..end
}

/// Clamp to the text length and step back to the nearest char boundary.
pub(crate) fn clamp_offset(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}
