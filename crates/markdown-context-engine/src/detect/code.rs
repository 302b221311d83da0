//! Code payload extraction for code spans and code blocks.

use std::sync::OnceLock;

use markdown_context_syntax::{SyntaxKind, SyntaxNode};
use regex::Regex;

use crate::context::CodeContext;
use crate::detect::node_span;

/// Columns of indentation that belong to indented code syntax, not payload.
const CODE_INDENT: usize = 4;

/// Payload of an inline code span: everything between the backtick runs.
///
/// Returns `None` unless the text is one backtick-delimited span on a single
/// line with matching opening and closing runs.
pub fn inline_code(text: &str) -> Option<String> {
    let ticks = text.len() - text.trim_start_matches('`').len();
    if ticks == 0 || text.len() < ticks * 2 || text.contains('\n') {
        return None;
    }

    let inner = &text[ticks..text.len() - ticks];
    let closing = &text[text.len() - ticks..];
    if closing.bytes().any(|b| b != b'`') || inner.ends_with('`') {
        return None;
    }

    Some(inner.to_string())
}

/// Ways of pulling the payload out of a code block node, tried in order.
type BlockStrategy = fn(&SyntaxNode) -> Option<String>;

const BLOCK_STRATEGIES: [BlockStrategy; 2] = [from_code_text_children, from_fenced_text];

/// Payload of a fenced or indented code block.
pub fn block_code(node: &SyntaxNode) -> Option<String> {
    BLOCK_STRATEGIES.iter().find_map(|strategy| strategy(node))
}

/// Tree path: concatenate CODE_TEXT children in document order.
///
/// Indented code lines lose up to four columns of indentation.
pub fn from_code_text_children(node: &SyntaxNode) -> Option<String> {
    let indented = node.kind() == SyntaxKind::INDENTED_CODE;
    let mut code = String::new();
    let mut found = false;

    for child in node.children().filter(|c| c.kind() == SyntaxKind::CODE_TEXT) {
        found = true;
        let text = child.text().to_string();
        if indented {
            code.push_str(strip_indent(&text, CODE_INDENT));
        } else {
            code.push_str(&text);
        }
    }

    found.then_some(code)
}

fn opening_fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[ \t]*(?:`{3,}|~{3,})[^\n]*(?:\r?\n|$)")
            .expect("Invalid opening fence regex pattern")
    })
}

fn closing_fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:^|\r?\n)[ \t]*(?:`{3,}|~{3,})[ \t]*(?:\r?\n)?$")
            .expect("Invalid closing fence regex pattern")
    })
}

/// Regex path: strip the fence lines from the block's full text.
///
/// Used when the block carries no CODE_TEXT children, e.g. an empty fence.
pub fn from_fenced_text(node: &SyntaxNode) -> Option<String> {
    Some(strip_fences(&node.text().to_string()))
}

pub fn strip_fences(text: &str) -> String {
    let body = opening_fence_regex().replace(text, "");
    closing_fence_regex().replace(&body, "").into_owned()
}

fn strip_indent(line: &str, columns: usize) -> &str {
    let mut width = 0;
    for (i, c) in line.char_indices() {
        if width >= columns {
            return &line[i..];
        }
        match c {
            ' ' => width += 1,
            '\t' => width += CODE_INDENT - width % CODE_INDENT,
            _ => return &line[i..],
        }
    }
    ""
}

/// Code context for a CODE_SPAN, FENCED_CODE or INDENTED_CODE node.
pub fn code_context(node: &SyntaxNode) -> Option<CodeContext> {
    let code = match node.kind() {
        SyntaxKind::CODE_SPAN => inline_code(&node.text().to_string())?,
        SyntaxKind::FENCED_CODE | SyntaxKind::INDENTED_CODE => block_code(node)?,
        _ => return None,
    };

    let span = node_span(node);
    Some(CodeContext {
        code,
        from: span.start,
        to: span.end,
    })
}
