//! Links, images, autolinks, bare URLs and HTML `<img>` tags.

use std::ops::Range;
use std::sync::OnceLock;

use markdown_context_syntax::{SyntaxKind, SyntaxNode};
use regex::Regex;

use crate::context::LinkContext;
use crate::detect::references::{self, strip_brackets};
use crate::detect::url::{classify_url, trim_bare_url};
use crate::detect::node_span;

/// URL child of a link-like node, with the title that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    pub url: String,
    pub span: Range<usize>,
    pub title_token: Option<String>,
}

/// Walk the direct children of a LINK, IMAGE or LINK_REFERENCE node for the
/// URL and an optional raw title token after it.
///
/// Returns `None` for reference-style links, which have no URL child.
pub fn extract_url(node: &SyntaxNode) -> Option<LinkTarget> {
    let mut children = node.children();
    let url = children.find(|child| child.kind() == SyntaxKind::URL)?;
    let title_token = children
        .find(|child| child.kind() == SyntaxKind::LINK_TITLE)
        .map(|title| title.text().to_string());

    Some(LinkTarget {
        url: url.text().to_string(),
        span: node_span(&url),
        title_token,
    })
}

/// Label of a reference-style link.
///
/// `[text][label]` uses the label. `[text]`, and `[text][]` with its empty
/// label, fall back to the visible text.
pub fn reference_label(node: &SyntaxNode) -> Option<String> {
    let explicit = node
        .children()
        .find(|child| child.kind() == SyntaxKind::LINK_LABEL)
        .map(|label| strip_brackets(&label.text().to_string()).trim().to_string())
        .filter(|label| !label.is_empty());

    explicit.or_else(|| {
        node.children()
            .find(|child| child.kind() == SyntaxKind::LINK_TEXT)
            .map(|text| strip_brackets(&text.text().to_string()).to_string())
    })
}

/// Link context for any link-like node, or `None` when the node is not a
/// link or its URL does not classify.
///
/// A URL node nested in a LINK or IMAGE yields nothing on its own; the
/// enclosing construct owns it. The URL of a reference definition is reported
/// as a reference link, since rewriting it in place would break the definition.
pub fn link_context(root: &SyntaxNode, node: &SyntaxNode) -> Option<LinkContext> {
    match node.kind() {
        SyntaxKind::LINK => markdown_link(root, node, false),
        SyntaxKind::IMAGE => markdown_link(root, node, true),
        SyntaxKind::AUTOLINK => autolink(node),
        SyntaxKind::URL => {
            let parent = node.parent()?;
            match parent.kind() {
                SyntaxKind::AUTOLINK => autolink(&parent),
                SyntaxKind::LINK_REFERENCE => definition_url(&parent),
                SyntaxKind::LINK | SyntaxKind::IMAGE => None,
                _ => bare_url(node),
            }
        }
        _ => None,
    }
}

/// Destination of a `[label]: url "title"` definition.
fn definition_url(node: &SyntaxNode) -> Option<LinkContext> {
    let target = extract_url(node)?;
    let link_type = classify_url(&target.url)?;

    Some(LinkContext {
        url: target.url,
        link_type,
        from: target.span.start,
        to: target.span.end,
        markdown_link: None,
        is_reference_link: true,
        title_token: target.title_token,
        is_image: false,
    })
}

fn markdown_link(root: &SyntaxNode, node: &SyntaxNode, is_image: bool) -> Option<LinkContext> {
    let span = node_span(node);

    if let Some(target) = extract_url(node) {
        let link_type = classify_url(&target.url)?;
        return Some(LinkContext {
            url: target.url,
            link_type,
            from: target.span.start,
            to: target.span.end,
            markdown_link: Some(span),
            is_reference_link: false,
            title_token: target.title_token,
            is_image,
        });
    }

    let label = reference_label(node)?;
    let url = references::resolve(root, &label)?;
    let link_type = classify_url(&url)?;
    log::debug!("resolved reference [{label}] to {url}");

    Some(LinkContext {
        url,
        link_type,
        from: span.start,
        to: span.end,
        markdown_link: None,
        is_reference_link: true,
        title_token: None,
        is_image,
    })
}

/// `<https://...>` or `<user@host>`. Email autolinks classify as `mailto:`.
fn autolink(node: &SyntaxNode) -> Option<LinkContext> {
    let url_node = node
        .children()
        .find(|child| child.kind() == SyntaxKind::URL)?;
    let raw = url_node.text().to_string();

    let url = if classify_url(&raw).is_none() && raw.contains('@') && !raw.contains(':') {
        format!("mailto:{raw}")
    } else {
        raw
    };
    let link_type = classify_url(&url)?;
    let url_span = node_span(&url_node);

    Some(LinkContext {
        url,
        link_type,
        from: url_span.start,
        to: url_span.end,
        markdown_link: Some(node_span(node)),
        is_reference_link: false,
        title_token: None,
        is_image: false,
    })
}

fn bare_url(node: &SyntaxNode) -> Option<LinkContext> {
    let raw = node.text().to_string();
    let url = trim_bare_url(&raw);
    let link_type = classify_url(url)?;
    let span = node_span(node);

    Some(LinkContext {
        url: url.to_string(),
        link_type,
        from: span.start,
        to: span.start + url.len(),
        markdown_link: None,
        is_reference_link: false,
        title_token: None,
        is_image: false,
    })
}

fn img_src_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)^<img\b[^>]*?\bsrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
            .expect("Invalid img src regex pattern")
    })
}

/// Image context for an HTML `<img src=...>` tag. Other tags yield `None`.
pub fn html_image(node: &SyntaxNode) -> Option<LinkContext> {
    let tag = node.text().to_string();
    let captures = img_src_regex().captures(&tag)?;
    let src = captures
        .get(1)
        .or_else(|| captures.get(2))
        .or_else(|| captures.get(3))?;
    let link_type = classify_url(src.as_str())?;
    let start = node_span(node).start;

    Some(LinkContext {
        url: src.as_str().to_string(),
        link_type,
        from: start + src.start(),
        to: start + src.end(),
        markdown_link: None,
        is_reference_link: false,
        title_token: None,
        is_image: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::LinkType;
    use markdown_context_syntax::parse;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn first(tree: &SyntaxNode, kind: SyntaxKind) -> SyntaxNode {
        tree.descendants().find(|n| n.kind() == kind).unwrap()
    }

    #[test]
    fn nested_parentheses_stay_in_url() {
        let text = "[text](https://example.com/foo(bar))";
        let tree = parse(text);
        let target = extract_url(&first(&tree, SyntaxKind::LINK)).unwrap();
        assert_eq!(target.url, "https://example.com/foo(bar)");
        assert_eq!(&text[target.span], "https://example.com/foo(bar)");
    }

    #[rstest]
    #[case(r#"[t](https://x.io "Title")"#, Some(r#""Title""#))]
    #[case(r#"[t](https://x.io 'It\'s')"#, Some(r#"'It\'s'"#))]
    #[case(r#"[t](https://x.io (Paren))"#, Some("(Paren)"))]
    #[case("[t](https://x.io)", None)]
    fn title_token_is_raw(#[case] text: &str, #[case] expected: Option<&str>) {
        let tree = parse(text);
        let target = extract_url(&first(&tree, SyntaxKind::LINK)).unwrap();
        assert_eq!(target.title_token.as_deref(), expected);
    }

    #[rstest]
    #[case("[text][Label]", "Label")]
    #[case("[Shortcut]", "Shortcut")]
    #[case("[Collapsed][]", "Collapsed")]
    fn reference_labels(#[case] text: &str, #[case] expected: &str) {
        let tree = parse(text);
        let link = first(&tree, SyntaxKind::LINK);
        assert_eq!(extract_url(&link), None);
        assert_eq!(reference_label(&link).as_deref(), Some(expected));
    }

    #[test]
    fn inline_link_context() {
        let text = "[Docs](https://d.io \"D\")";
        let tree = parse(text);
        let link = link_context(&tree, &first(&tree, SyntaxKind::LINK)).unwrap();
        assert_eq!(
            link,
            LinkContext {
                url: "https://d.io".to_string(),
                link_type: LinkType::External,
                from: 7,
                to: 19,
                markdown_link: Some(0..24),
                is_reference_link: false,
                title_token: Some("\"D\"".to_string()),
                is_image: false,
            }
        );
    }

    #[test]
    fn reference_link_context_spans_the_link() {
        let text = "See [docs][d].\n\n[D]: https://d.io\n";
        let tree = parse(text);
        let link = link_context(&tree, &first(&tree, SyntaxKind::LINK)).unwrap();
        assert_eq!(link.url, "https://d.io");
        assert!(link.is_reference_link);
        assert_eq!(&text[link.from..link.to], "[docs][d]");
        assert_eq!(link.markdown_link, None);
    }

    #[test]
    fn unresolved_reference_is_not_a_link() {
        let tree = parse("[nothing here]");
        assert_eq!(link_context(&tree, &first(&tree, SyntaxKind::LINK)), None);
    }

    #[test]
    fn unclassified_url_is_not_a_link() {
        let tree = parse("[page](notes/page.md)");
        assert_eq!(link_context(&tree, &first(&tree, SyntaxKind::LINK)), None);
    }

    #[test]
    fn bare_url_drops_trailing_punctuation() {
        let text = "Visit https://x.io/a.";
        let tree = parse(text);
        let link = link_context(&tree, &first(&tree, SyntaxKind::URL)).unwrap();
        assert_eq!(link.url, "https://x.io/a");
        assert_eq!(&text[link.from..link.to], "https://x.io/a");
        assert_eq!(link.markdown_link, None);
    }

    #[rstest]
    #[case("<https://x.io>", "https://x.io", LinkType::External)]
    #[case("<me@x.io>", "mailto:me@x.io", LinkType::Email)]
    fn autolinks(#[case] text: &str, #[case] url: &str, #[case] link_type: LinkType) {
        let tree = parse(text);
        let url_node = first(&tree, SyntaxKind::URL);
        let link = link_context(&tree, &url_node).unwrap();
        assert_eq!(link.url, url);
        assert_eq!(link.link_type, link_type);
        assert_eq!(link.markdown_link, Some(0..text.len()));
    }

    #[test]
    fn definition_url_is_a_reference_link() {
        let text = "[foo]: https://f.io \"Foo\"\n";
        let tree = parse(text);
        let link = link_context(&tree, &first(&tree, SyntaxKind::URL)).unwrap();
        assert_eq!(
            link,
            LinkContext {
                url: "https://f.io".to_string(),
                link_type: LinkType::External,
                from: 7,
                to: 19,
                markdown_link: None,
                is_reference_link: true,
                title_token: Some("\"Foo\"".to_string()),
                is_image: false,
            }
        );

        let local = parse("[foo]: notes.md\n");
        assert_eq!(link_context(&local, &first(&local, SyntaxKind::URL)), None);
    }

    #[test]
    fn url_inside_link_defers_to_link() {
        let tree = parse("[a](https://x.io)");
        assert_eq!(link_context(&tree, &first(&tree, SyntaxKind::URL)), None);
    }

    #[rstest]
    #[case(r#"<img src="https://x.io/a.png" alt="a">"#, Some("https://x.io/a.png"))]
    #[case(r#"<IMG width=10 src='https://x.io/b.png'>"#, Some("https://x.io/b.png"))]
    #[case("<img src=https://x.io/c.png>", Some("https://x.io/c.png"))]
    #[case(r#"<img src="local.png">"#, None)]
    #[case(r#"<a href="https://x.io">"#, None)]
    fn html_images(#[case] text: &str, #[case] expected: Option<&str>) {
        let tree = parse(text);
        let tag = first(&tree, SyntaxKind::HTML_TAG);
        let image = html_image(&tag);
        assert_eq!(image.as_ref().map(|i| i.url.as_str()), expected);
        if let Some(image) = image {
            assert!(image.is_image);
            assert_eq!(&text[image.from..image.to], image.url);
        }
    }
}
