//! Primary context at a single position.
//!
//! Node kinds map to handlers through a fixed priority table. For each
//! entry in order, every enclosing node of a matching kind is tried,
//! innermost first; the first handler that returns a context wins. A handler
//! that declines (an `<b>` tag, a link whose URL does not classify) does not
//! stop the search.

use markdown_context_syntax::{SyntaxKind, SyntaxNode};

use crate::context::Context;
use crate::detect::{Snapshot, code, footnote, link};

type Handler = fn(&Snapshot<'_>, &SyntaxNode) -> Option<Context>;

const PRIORITY: [(&[SyntaxKind], Handler); 5] = [
    (
        &[
            SyntaxKind::CODE_SPAN,
            SyntaxKind::FENCED_CODE,
            SyntaxKind::INDENTED_CODE,
        ],
        code_handler,
    ),
    (&[SyntaxKind::LINK], link_handler),
    (&[SyntaxKind::IMAGE], link_handler),
    (&[SyntaxKind::URL, SyntaxKind::AUTOLINK], link_handler),
    (&[SyntaxKind::HTML_TAG], html_image_handler),
];

fn code_handler(_: &Snapshot<'_>, node: &SyntaxNode) -> Option<Context> {
    code::code_context(node).map(Context::Code)
}

fn link_handler(snapshot: &Snapshot<'_>, node: &SyntaxNode) -> Option<Context> {
    link::link_context(snapshot.tree, node).map(Context::Link)
}

fn html_image_handler(_: &Snapshot<'_>, node: &SyntaxNode) -> Option<Context> {
    link::html_image(node).map(Context::Link)
}

/// Highest-priority context at `pos`, falling back to a footnote reference on
/// the current line.
pub fn primary_context(snapshot: &Snapshot<'_>, pos: usize) -> Option<Context> {
    let enclosing = snapshot.enclosing_nodes(pos);

    for (kinds, handler) in PRIORITY {
        for node in enclosing.iter().rev().filter(|n| kinds.contains(&n.kind())) {
            if let Some(context) = handler(snapshot, node) {
                log::debug!("{:?} at {pos} classified from {:?}", context.kind(), node.kind());
                return Some(context);
            }
        }
    }

    footnote::footnote_at(snapshot.text, pos).map(Context::Footnote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{CodeContext, ContextKind, LinkType};
    use markdown_context_syntax::parse;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn primary(text: &str, pos: usize) -> Option<Context> {
        let tree = parse(text);
        primary_context(&Snapshot::new(text, &tree), pos)
    }

    fn kind_at(text: &str, needle: &str) -> Option<ContextKind> {
        let pos = text.find(needle).unwrap();
        primary(text, pos).map(|c| c.kind())
    }

    #[rstest]
    #[case("Run `cargo test` now", "cargo", Some(ContextKind::Code))]
    #[case("[docs](https://d.io)", "docs", Some(ContextKind::Link))]
    #[case("![logo](https://d.io/l.png)", "logo", Some(ContextKind::Image))]
    #[case("See https://d.io today", "d.io", Some(ContextKind::Link))]
    #[case("Mail <me@d.io>", "me@", Some(ContextKind::Link))]
    #[case("<img src=\"https://d.io/i.png\">", "src", Some(ContextKind::Image))]
    #[case("<b>bold</b>", "b>", None)]
    #[case("Plain words", "words", None)]
    #[case("[local](notes.md)", "local", None)]
    fn classification(
        #[case] text: &str,
        #[case] needle: &str,
        #[case] expected: Option<ContextKind>,
    ) {
        assert_eq!(kind_at(text, needle), expected);
    }

    #[test]
    fn code_beats_link_in_link_text() {
        let text = "[`code`](https://d.io)";
        let found = primary(text, 3).unwrap();
        assert_eq!(
            found,
            Context::Code(CodeContext {
                code: "code".to_string(),
                from: 1,
                to: 7,
            })
        );
    }

    #[test]
    fn link_beats_image_inside_its_text() {
        let text = "[![badge](https://ci.io/b.svg)](https://ci.io)";
        let Some(Context::Link(link)) = primary(text, 4) else {
            panic!("expected a link");
        };
        assert_eq!(link.url, "https://ci.io");
        assert!(!link.is_image);
    }

    #[test]
    fn falls_through_unclassified_link_to_image() {
        // The link declines, so the image in its text is tried next
        let text = "[![i](https://d.io/i.png)](notes.md)";
        let Some(Context::Link(image)) = primary(text, 3) else {
            panic!("expected an image");
        };
        assert_eq!(image.url, "https://d.io/i.png");
        assert_eq!(image.link_type, LinkType::External);
        assert!(image.is_image);
    }

    #[test]
    fn footnote_fallback() {
        let text = "Claim[^1].\n\n[^1]: Source.\n";
        assert_eq!(kind_at(text, "^1]."), Some(ContextKind::Footnote));
    }

    #[test]
    fn cursor_at_link_end_is_inside() {
        let text = "[a](https://d.io) tail";
        assert_eq!(
            primary(text, 17).map(|c| c.kind()),
            Some(ContextKind::Link)
        );
        assert_eq!(primary(text, 18), None);
    }

    #[test]
    fn fenced_block_payload() {
        let text = "```sh\necho hi\n```\n";
        let Some(Context::Code(code)) = primary(text, 8) else {
            panic!("expected code");
        };
        assert_eq!(code.code, "echo hi");
        assert_eq!((code.from, code.to), (0, text.len()));
    }
}
