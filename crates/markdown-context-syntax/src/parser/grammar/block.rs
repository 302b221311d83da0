//! Block-level grammar rules.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

use super::inline;

/// Columns of leading whitespace that turn a line into indented code.
const CODE_INDENT: usize = 4;

/// Parse one block element and return its kind.
///
/// Returns `None` when only blank lines were left before the end of input.
pub fn block(p: &mut Parser<'_, '_>, previous: Option<SyntaxKind>) -> Option<SyntaxKind> {
    skip_blank_lines(p);

    if p.at_end() {
        return None;
    }

    let kind = match p.current() {
        SyntaxKind::HASH => heading(p),
        SyntaxKind::GT => blockquote(p),
        SyntaxKind::BACKTICK | SyntaxKind::TILDE if is_code_fence(p, 0) => fenced_code(p),
        SyntaxKind::LBRACKET if is_link_reference(p) => link_reference(p),
        SyntaxKind::DASH | SyntaxKind::STAR if is_thematic_break(p) => thematic_break(p),
        SyntaxKind::WHITESPACE => indented_block(p, previous),
        _ if is_list_item(p) => list_item(p),
        _ => paragraph(p),
    };

    Some(kind)
}

/// Blank lines (including whitespace-only ones) stay as bare tokens under ROOT.
fn skip_blank_lines(p: &mut Parser<'_, '_>) {
    loop {
        if p.at(SyntaxKind::NEWLINE) {
            p.bump();
        } else if p.at(SyntaxKind::WHITESPACE)
            && matches!(p.nth(1), SyntaxKind::NEWLINE | SyntaxKind::EOF)
        {
            p.bump();
            p.eat(SyntaxKind::NEWLINE);
        } else {
            break;
        }
    }
}

/// Width in columns of a leading whitespace run, with tab stops every 4.
fn indent_width(whitespace: &str) -> usize {
    whitespace.chars().fold(0, |col, c| {
        if c == '\t' {
            col + CODE_INDENT - col % CODE_INDENT
        } else {
            col + 1
        }
    })
}

/// Number of consecutive `kind` tokens starting `from` tokens ahead.
fn run_length(p: &Parser<'_, '_>, from: usize, kind: SyntaxKind) -> usize {
    let mut n = 0;
    while p.nth(from + n) == kind {
        n += 1;
    }
    n
}

/// Line content that starts with whitespace: nested list item, indented
/// code, indented fence or a plain paragraph.
fn indented_block(p: &mut Parser<'_, '_>, previous: Option<SyntaxKind>) -> SyntaxKind {
    let indent = indent_width(p.current_text());

    // Indented lines under a list item continue the item, not code. Anywhere
    // else four columns make code, even when the line looks like a list item.
    if indent >= CODE_INDENT && previous != Some(SyntaxKind::LIST_ITEM) {
        return indented_code(p);
    }
    if is_list_item(p) {
        return list_item(p);
    }
    if indent < CODE_INDENT && is_code_fence(p, 1) {
        return fenced_code(p);
    }

    paragraph(p)
}

/// `-`, `*` or `+` followed by whitespace, optionally indented.
fn is_list_item(p: &Parser<'_, '_>) -> bool {
    let i = usize::from(p.at(SyntaxKind::WHITESPACE));
    matches!(
        p.nth(i),
        SyntaxKind::DASH | SyntaxKind::STAR | SyntaxKind::PLUS
    ) && p.nth(i + 1) == SyntaxKind::WHITESPACE
}

/// Check if current position is a thematic break (---, ***, etc.)
fn is_thematic_break(p: &Parser<'_, '_>) -> bool {
    let marker = p.current();
    let mut count = 0;
    let mut i = 0;

    while !matches!(p.nth(i), SyntaxKind::EOF | SyntaxKind::NEWLINE) {
        match p.nth(i) {
            k if k == marker => count += 1,
            SyntaxKind::WHITESPACE => {}
            _ => return false,
        }
        i += 1;
    }

    count >= 3
}

/// Three or more backticks or tildes `at` tokens ahead.
///
/// A backtick fence may not carry backticks in its info string, which keeps
/// one-line code spans like ```` ```x``` ```` out of fence detection.
fn is_code_fence(p: &Parser<'_, '_>, at: usize) -> bool {
    let marker = p.nth(at);
    if !matches!(marker, SyntaxKind::BACKTICK | SyntaxKind::TILDE) {
        return false;
    }

    let run = run_length(p, at, marker);
    if run < 3 {
        return false;
    }

    if marker == SyntaxKind::BACKTICK {
        let mut i = at + run;
        while !matches!(p.nth(i), SyntaxKind::NEWLINE | SyntaxKind::EOF) {
            if p.nth(i) == SyntaxKind::BACKTICK {
                return false;
            }
            i += 1;
        }
    }

    true
}

/// `[label]:` followed by a destination on the same line.
///
/// Labels starting with `^` are footnote definitions, which the tree does not
/// model.
fn is_link_reference(p: &Parser<'_, '_>) -> bool {
    if matches!(p.nth(1), SyntaxKind::CARET | SyntaxKind::RBRACKET) {
        return false;
    }

    let mut i = 1;
    while !matches!(
        p.nth(i),
        SyntaxKind::RBRACKET | SyntaxKind::LBRACKET | SyntaxKind::NEWLINE | SyntaxKind::EOF
    ) {
        i += 1;
    }

    if p.nth(i) != SyntaxKind::RBRACKET || p.nth(i + 1) != SyntaxKind::COLON {
        return false;
    }

    i += 2;
    if p.nth(i) == SyntaxKind::WHITESPACE {
        i += 1;
    }

    !matches!(p.nth(i), SyntaxKind::NEWLINE | SyntaxKind::EOF)
}

/// Parse an ATX heading.
fn heading(p: &mut Parser<'_, '_>) -> SyntaxKind {
    let m = p.start();

    while p.at(SyntaxKind::HASH) {
        p.bump();
    }
    p.eat(SyntaxKind::WHITESPACE);
    inline::inline_until_newline(p);
    p.eat(SyntaxKind::NEWLINE);

    m.complete(p, SyntaxKind::HEADING);
    SyntaxKind::HEADING
}

/// Parse consecutive `>` lines into one blockquote.
fn blockquote(p: &mut Parser<'_, '_>) -> SyntaxKind {
    let m = p.start();

    loop {
        p.eat(SyntaxKind::WHITESPACE);
        p.bump(); // >
        p.eat(SyntaxKind::WHITESPACE);
        inline::inline_until_newline(p);

        if !p.eat(SyntaxKind::NEWLINE) {
            break;
        }

        let continues = p.at(SyntaxKind::GT)
            || (p.at(SyntaxKind::WHITESPACE) && p.nth(1) == SyntaxKind::GT);
        if !continues {
            break;
        }
    }

    m.complete(p, SyntaxKind::BLOCK_QUOTE);
    SyntaxKind::BLOCK_QUOTE
}

/// Parse a single list item line, detecting a leading task marker.
fn list_item(p: &mut Parser<'_, '_>) -> SyntaxKind {
    let m = p.start();

    p.eat(SyntaxKind::WHITESPACE);
    let marker = p.start();
    p.bump();
    marker.complete(p, SyntaxKind::LIST_MARKER);
    p.eat(SyntaxKind::WHITESPACE);

    if is_task_marker(p) {
        task(p);
    } else {
        inline::inline_until_newline(p);
    }
    p.eat(SyntaxKind::NEWLINE);

    m.complete(p, SyntaxKind::LIST_ITEM);
    SyntaxKind::LIST_ITEM
}

/// `[ ]`, `[x]` or `[X]` followed by whitespace or the end of the line.
fn is_task_marker(p: &Parser<'_, '_>) -> bool {
    let state = match p.nth(1) {
        SyntaxKind::WHITESPACE => p.nth_text(1) == " ",
        SyntaxKind::TEXT => matches!(p.nth_text(1), "x" | "X"),
        _ => false,
    };

    p.at(SyntaxKind::LBRACKET)
        && state
        && p.nth(2) == SyntaxKind::RBRACKET
        && matches!(
            p.nth(3),
            SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF
        )
}

fn task(p: &mut Parser<'_, '_>) {
    let m = p.start();

    let marker = p.start();
    p.bump_n(3);
    marker.complete(p, SyntaxKind::TASK_MARKER);
    inline::inline_until_newline(p);

    m.complete(p, SyntaxKind::TASK);
}

/// Parse a thematic break.
fn thematic_break(p: &mut Parser<'_, '_>) -> SyntaxKind {
    let m = p.start();
    p.bump_to_line_end();
    p.eat(SyntaxKind::NEWLINE);
    m.complete(p, SyntaxKind::THEMATIC_BREAK);
    SyntaxKind::THEMATIC_BREAK
}

/// Parse a fenced code block.
///
/// The payload lines become a single CODE_TEXT child. The line ending before
/// the closing fence stays outside it, so the payload never carries a
/// trailing newline of its own.
fn fenced_code(p: &mut Parser<'_, '_>) -> SyntaxKind {
    let m = p.start();

    p.eat(SyntaxKind::WHITESPACE);
    let fence_marker = p.current();
    let fence_len = run_length(p, 0, fence_marker);

    let open = p.start();
    p.bump_n(fence_len);
    open.complete(p, SyntaxKind::CODE_FENCE);

    p.eat(SyntaxKind::WHITESPACE);
    if !p.at_line_end() {
        let info = p.start();
        p.bump_to_line_end();
        info.complete(p, SyntaxKind::CODE_INFO);
    }

    if p.eat(SyntaxKind::NEWLINE) {
        let (content_len, closed) = scan_fenced_content(p, fence_marker, fence_len);

        if content_len > 0 {
            let text = p.start();
            p.bump_n(content_len);
            text.complete(p, SyntaxKind::CODE_TEXT);
        }
        p.eat(SyntaxKind::NEWLINE);

        if closed {
            p.eat(SyntaxKind::WHITESPACE);
            let close = p.start();
            while p.at(fence_marker) {
                p.bump();
            }
            close.complete(p, SyntaxKind::CODE_FENCE);
            p.bump_to_line_end();
            p.eat(SyntaxKind::NEWLINE);
        }
    }

    m.complete(p, SyntaxKind::FENCED_CODE);
    SyntaxKind::FENCED_CODE
}

/// Look ahead over the payload of a fenced block.
///
/// Returns the number of payload tokens (up to but excluding the line ending
/// of the last payload line) and whether a closing fence was found.
fn scan_fenced_content(
    p: &Parser<'_, '_>,
    marker: SyntaxKind,
    fence_len: usize,
) -> (usize, bool) {
    let mut i = 0;
    let mut content_end = 0;

    loop {
        if p.nth(i) == SyntaxKind::EOF {
            return (content_end, false);
        }
        if is_closing_fence(p, i, marker, fence_len) {
            return (content_end, true);
        }

        while !matches!(p.nth(i), SyntaxKind::NEWLINE | SyntaxKind::EOF) {
            i += 1;
        }
        content_end = i;
        if p.nth(i) == SyntaxKind::NEWLINE {
            i += 1;
        }
    }
}

fn is_closing_fence(p: &Parser<'_, '_>, at: usize, marker: SyntaxKind, fence_len: usize) -> bool {
    let mut i = at;
    if p.nth(i) == SyntaxKind::WHITESPACE && indent_width(p.nth_text(i)) < CODE_INDENT {
        i += 1;
    }

    let run = run_length(p, i, marker);
    if run < fence_len {
        return false;
    }

    i += run;
    if p.nth(i) == SyntaxKind::WHITESPACE {
        i += 1;
    }
    matches!(p.nth(i), SyntaxKind::NEWLINE | SyntaxKind::EOF)
}

/// Parse an indented code block, one CODE_TEXT per line.
///
/// Each CODE_TEXT keeps its indentation and, except for the last line, its
/// line ending.
fn indented_code(p: &mut Parser<'_, '_>) -> SyntaxKind {
    let m = p.start();

    loop {
        let line = p.start();
        p.bump_to_line_end();

        let continues = p.at(SyntaxKind::NEWLINE)
            && p.nth(1) == SyntaxKind::WHITESPACE
            && indent_width(p.nth_text(1)) >= CODE_INDENT
            && !matches!(p.nth(2), SyntaxKind::NEWLINE | SyntaxKind::EOF);

        if continues {
            p.bump();
            line.complete(p, SyntaxKind::CODE_TEXT);
        } else {
            line.complete(p, SyntaxKind::CODE_TEXT);
            p.eat(SyntaxKind::NEWLINE);
            break;
        }
    }

    m.complete(p, SyntaxKind::INDENTED_CODE);
    SyntaxKind::INDENTED_CODE
}

/// Parse a reference definition `[label]: destination "title"`.
fn link_reference(p: &mut Parser<'_, '_>) -> SyntaxKind {
    let m = p.start();

    inline::link_label(p);
    p.bump(); // :
    p.eat(SyntaxKind::WHITESPACE);
    inline::link_destination(p);

    if p.at(SyntaxKind::WHITESPACE) && inline::starts_title(p.nth(1)) {
        p.bump();
        inline::link_title(p);
    }

    p.bump_to_line_end();
    p.eat(SyntaxKind::NEWLINE);

    m.complete(p, SyntaxKind::LINK_REFERENCE);
    SyntaxKind::LINK_REFERENCE
}

/// Parse a paragraph (default block).
fn paragraph(p: &mut Parser<'_, '_>) -> SyntaxKind {
    let m = p.start();

    loop {
        inline::inline_until_newline(p);

        if !p.eat(SyntaxKind::NEWLINE) || p.at_end() || interrupts_paragraph(p) {
            break;
        }
    }

    m.complete(p, SyntaxKind::PARAGRAPH);
    SyntaxKind::PARAGRAPH
}

/// Block starts that end a running paragraph.
fn interrupts_paragraph(p: &Parser<'_, '_>) -> bool {
    match p.current() {
        SyntaxKind::NEWLINE | SyntaxKind::HASH | SyntaxKind::GT => true,
        SyntaxKind::WHITESPACE => {
            matches!(p.nth(1), SyntaxKind::NEWLINE | SyntaxKind::EOF)
                || (indent_width(p.current_text()) < CODE_INDENT
                    && (is_list_item(p) || is_code_fence(p, 1)))
        }
        SyntaxKind::BACKTICK | SyntaxKind::TILDE => is_code_fence(p, 0),
        _ => is_list_item(p),
    }
}
