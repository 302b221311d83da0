//! # Grammar Rules
//!
//! Each rule takes a `&mut Parser`, inspects tokens with `current`/`nth`,
//! consumes them with `bump`/`eat`, and wraps what it consumed in nodes via
//! `start()` → `complete()`/`abandon()`.
//!
//! - [`block`] - line-level structure: headings, lists and tasks, code blocks,
//!   reference definitions, paragraphs
//! - [`inline`] - links, images, autolinks, bare URLs, code spans, HTML tags
//!
//! Rules are lenient: malformed input still yields a tree holding every byte,
//! with unmatched markup left as plain tokens or `INLINE` runs.

mod block;
mod inline;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse the root document.
pub fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();

    let mut previous = None;
    while !p.at_end() {
        if let Some(kind) = block::block(p, previous) {
            previous = Some(kind);
        }
    }

    m.complete(p, SyntaxKind::ROOT);
}
