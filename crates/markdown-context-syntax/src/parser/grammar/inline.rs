//! Inline grammar rules.
//!
//! Inline constructs never cross a line ending. When a construct fails to
//! close, whatever was consumed is kept either as plain tokens or inside an
//! `INLINE` node, so the tree still holds every byte.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse inline content until end of line.
pub fn inline_until_newline(p: &mut Parser<'_, '_>) {
    while !p.at_line_end() {
        inline_element(p);
    }
}

fn inline_element(p: &mut Parser<'_, '_>) {
    let kind = p.current();
    match kind {
        // `[^` opens a footnote reference, never a link
        SyntaxKind::LBRACKET if p.nth(1) != SyntaxKind::CARET => link(p),
        SyntaxKind::EXCLAIM if is_image_start(p) => image(p),
        SyntaxKind::BACKTICK => code_span(p),
        SyntaxKind::STAR | SyntaxKind::UNDERSCORE => emphasis_or_strong(p, kind),
        SyntaxKind::TILDE if p.nth(1) == SyntaxKind::TILDE => {
            delimited(p, SyntaxKind::TILDE, 2, SyntaxKind::STRIKETHROUGH)
        }
        SyntaxKind::LT if is_autolink(p) => autolink(p),
        SyntaxKind::LT if is_html_tag(p) => html_tag(p),
        SyntaxKind::TEXT if is_bare_url(p) => bare_url(p),
        _ => p.bump(),
    }
}

fn is_image_start(p: &Parser<'_, '_>) -> bool {
    p.at(SyntaxKind::EXCLAIM)
        && p.nth(1) == SyntaxKind::LBRACKET
        && p.nth(2) != SyntaxKind::CARET
}

fn run_length(p: &Parser<'_, '_>, from: usize, kind: SyntaxKind) -> usize {
    let mut n = 0;
    while p.nth(from + n) == kind {
        n += 1;
    }
    n
}

/// `[text]`, `[text](dest)`, `[text][label]` or `[text][]`.
fn link(p: &mut Parser<'_, '_>) {
    let m = p.start();
    let kind = if link_body(p) {
        SyntaxKind::LINK
    } else {
        SyntaxKind::INLINE
    };
    m.complete(p, kind);
}

/// `!` followed by a link body.
fn image(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump(); // !
    let kind = if link_body(p) {
        SyntaxKind::IMAGE
    } else {
        SyntaxKind::INLINE
    };
    m.complete(p, kind);
}

/// Bracketed text plus an optional inline destination or reference label.
///
/// Returns false when the brackets or the destination never close.
fn link_body(p: &mut Parser<'_, '_>) -> bool {
    if !link_text(p) {
        return false;
    }

    match p.current() {
        SyntaxKind::LPAREN => inline_destination(p),
        SyntaxKind::LBRACKET if p.nth(1) != SyntaxKind::CARET => {
            link_label(p);
            true
        }
        // Shortcut reference: `[label]` alone
        _ => true,
    }
}

fn link_text(p: &mut Parser<'_, '_>) -> bool {
    let m = p.start();
    p.bump(); // [

    let mut depth = 0usize;
    loop {
        match p.current() {
            SyntaxKind::NEWLINE | SyntaxKind::EOF => break,
            SyntaxKind::RBRACKET if depth == 0 => break,
            SyntaxKind::RBRACKET => {
                depth -= 1;
                p.bump();
            }
            SyntaxKind::LBRACKET => {
                depth += 1;
                p.bump();
            }
            SyntaxKind::EXCLAIM if is_image_start(p) => image(p),
            SyntaxKind::BACKTICK => code_span(p),
            SyntaxKind::LT if is_html_tag(p) => html_tag(p),
            _ => p.bump(),
        }
    }

    if p.eat(SyntaxKind::RBRACKET) {
        m.complete(p, SyntaxKind::LINK_TEXT);
        true
    } else {
        m.abandon(p);
        false
    }
}

/// `(destination "title")`, with whitespace allowed around both parts.
fn inline_destination(p: &mut Parser<'_, '_>) -> bool {
    p.bump(); // (
    p.eat(SyntaxKind::WHITESPACE);

    if !p.at(SyntaxKind::RPAREN) {
        link_destination(p);
    }

    if p.at(SyntaxKind::WHITESPACE) && starts_title(p.nth(1)) {
        p.bump();
        link_title(p);
    }

    p.eat(SyntaxKind::WHITESPACE);
    p.eat(SyntaxKind::RPAREN)
}

/// Parse a link destination into a URL node.
///
/// `<...>` destinations keep their angle brackets outside the URL node.
/// Bare destinations run until whitespace or an unbalanced `)`.
pub fn link_destination(p: &mut Parser<'_, '_>) {
    if p.at(SyntaxKind::LT) {
        p.bump();
        let m = p.start();
        while !matches!(
            p.current(),
            SyntaxKind::GT | SyntaxKind::NEWLINE | SyntaxKind::EOF
        ) {
            p.bump();
        }
        m.complete(p, SyntaxKind::URL);
        p.eat(SyntaxKind::GT);
        return;
    }

    let m = p.start();
    let mut depth = 0usize;
    loop {
        match p.current() {
            SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF => break,
            SyntaxKind::RPAREN if depth == 0 => break,
            SyntaxKind::RPAREN => {
                depth -= 1;
                p.bump();
            }
            SyntaxKind::LPAREN => {
                depth += 1;
                p.bump();
            }
            _ => p.bump(),
        }
    }
    m.complete(p, SyntaxKind::URL);
}

pub fn starts_title(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::QUOTE | SyntaxKind::APOSTROPHE | SyntaxKind::LPAREN
    )
}

/// Parse a link title, delimiters included.
///
/// A delimiter right after a backslash does not close the title.
pub fn link_title(p: &mut Parser<'_, '_>) {
    let m = p.start();

    let close = match p.current() {
        SyntaxKind::LPAREN => SyntaxKind::RPAREN,
        kind => kind,
    };
    p.bump();

    while !p.at_line_end() {
        let escaped = p.prev_text().ends_with('\\');
        let kind = p.current();
        p.bump();
        if kind == close && !escaped {
            break;
        }
    }

    m.complete(p, SyntaxKind::LINK_TITLE);
}

/// `[label]` of a reference link or definition, brackets included.
pub fn link_label(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump(); // [
    while !matches!(
        p.current(),
        SyntaxKind::RBRACKET | SyntaxKind::NEWLINE | SyntaxKind::EOF
    ) {
        p.bump();
    }
    p.eat(SyntaxKind::RBRACKET);
    m.complete(p, SyntaxKind::LINK_LABEL);
}

/// Backtick-delimited code span.
///
/// The span closes on the next backtick run of the same length on the line.
/// Without one, the opening run stays plain text.
fn code_span(p: &mut Parser<'_, '_>) {
    let open = run_length(p, 0, SyntaxKind::BACKTICK);

    let mut i = open;
    let mut close_at = None;
    while !matches!(p.nth(i), SyntaxKind::NEWLINE | SyntaxKind::EOF) {
        if p.nth(i) == SyntaxKind::BACKTICK {
            let run = run_length(p, i, SyntaxKind::BACKTICK);
            if run == open {
                close_at = Some(i);
                break;
            }
            i += run;
        } else {
            i += 1;
        }
    }

    let Some(close_at) = close_at else {
        p.bump_n(open);
        return;
    };

    let m = p.start();
    p.bump_n(close_at + open);
    m.complete(p, SyntaxKind::CODE_SPAN);
}

fn emphasis_or_strong(p: &mut Parser<'_, '_>, delimiter: SyntaxKind) {
    if run_length(p, 0, delimiter) >= 2 {
        delimited(p, delimiter, 2, SyntaxKind::STRONG);
    } else {
        delimited(p, delimiter, 1, SyntaxKind::EMPHASIS);
    }
}

/// Parse `open` delimiters, nested inline content, and a closing run.
///
/// Delimiters that cannot open (followed by whitespace) or that have no
/// closing run later on the line are left as plain tokens.
fn delimited(p: &mut Parser<'_, '_>, delimiter: SyntaxKind, open: usize, kind: SyntaxKind) {
    let opens = !matches!(
        p.nth(open),
        SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF
    );
    if !opens || !has_closing_run(p, delimiter, open) {
        let run = run_length(p, 0, delimiter);
        p.bump_n(run);
        return;
    }

    let m = p.start();
    p.bump_n(open);

    while !p.at_line_end() {
        if p.at(delimiter) {
            let run = run_length(p, 0, delimiter);
            if run >= open {
                p.bump_n(open);
                break;
            }
            p.bump_n(run);
            continue;
        }
        inline_element(p);
    }

    m.complete(p, kind);
}

fn has_closing_run(p: &Parser<'_, '_>, delimiter: SyntaxKind, open: usize) -> bool {
    let mut i = open;
    while !matches!(p.nth(i), SyntaxKind::NEWLINE | SyntaxKind::EOF) {
        if p.nth(i) == delimiter {
            let run = run_length(p, i, delimiter);
            if run >= open && p.nth(i - 1) != SyntaxKind::WHITESPACE {
                return true;
            }
            i += run;
        } else {
            i += 1;
        }
    }
    false
}

/// `<scheme:...>` or `<user@host>` with no whitespace inside.
fn is_autolink(p: &Parser<'_, '_>) -> bool {
    if p.nth(1) != SyntaxKind::TEXT {
        return false;
    }

    let is_uri = p.nth(2) == SyntaxKind::COLON && is_scheme(p.nth_text(1));
    let mut has_at = false;
    let mut i = 1;
    loop {
        match p.nth(i) {
            SyntaxKind::GT => return i > 1 && (is_uri || has_at),
            SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF | SyntaxKind::LT => {
                return false;
            }
            SyntaxKind::TEXT => has_at |= p.nth_text(i).contains('@'),
            _ => {}
        }
        i += 1;
    }
}

fn is_scheme(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && (2..=32).contains(&text.len())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '.')
}

fn autolink(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump(); // <

    let url = p.start();
    while !p.at(SyntaxKind::GT) {
        p.bump();
    }
    url.complete(p, SyntaxKind::URL);

    p.bump(); // >
    m.complete(p, SyntaxKind::AUTOLINK);
}

/// `<tag ...>` or `</tag>` closed on the same line.
fn is_html_tag(p: &Parser<'_, '_>) -> bool {
    let opens_tag = p.nth(1) == SyntaxKind::TEXT
        && p
            .nth_text(1)
            .starts_with(|c: char| c.is_ascii_alphabetic() || c == '/');
    if !opens_tag {
        return false;
    }

    let mut i = 2;
    loop {
        match p.nth(i) {
            SyntaxKind::GT => return true,
            SyntaxKind::NEWLINE | SyntaxKind::EOF | SyntaxKind::LT => return false,
            _ => i += 1,
        }
    }
}

fn html_tag(p: &mut Parser<'_, '_>) {
    let m = p.start();
    while !p.at(SyntaxKind::GT) {
        p.bump();
    }
    p.bump(); // >
    m.complete(p, SyntaxKind::HTML_TAG);
}

/// `http://` or `https://` in running text.
fn is_bare_url(p: &Parser<'_, '_>) -> bool {
    let scheme = p.current_text();
    (scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https"))
        && p.nth(1) == SyntaxKind::COLON
        && p.nth_text(2).starts_with("//")
}

/// A bare URL runs until whitespace or markup that cannot be part of it.
///
/// Parentheses are kept only while balanced, so `(see https://x.io)` leaves
/// the closing paren out.
fn bare_url(p: &mut Parser<'_, '_>) {
    let m = p.start();
    let mut depth = 0usize;
    loop {
        match p.current() {
            SyntaxKind::WHITESPACE
            | SyntaxKind::NEWLINE
            | SyntaxKind::EOF
            | SyntaxKind::LT
            | SyntaxKind::GT
            | SyntaxKind::LBRACKET
            | SyntaxKind::RBRACKET
            | SyntaxKind::BACKTICK
            | SyntaxKind::QUOTE
            | SyntaxKind::APOSTROPHE
            | SyntaxKind::STAR
            | SyntaxKind::TILDE => break,
            SyntaxKind::RPAREN if depth == 0 => break,
            SyntaxKind::RPAREN => {
                depth -= 1;
                p.bump();
            }
            SyntaxKind::LPAREN => {
                depth += 1;
                p.bump();
            }
            _ => p.bump(),
        }
    }
    m.complete(p, SyntaxKind::URL);
}
