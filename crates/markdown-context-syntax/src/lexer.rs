//! # Lexer
//!
//! Breaks source text into tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! Every byte of the input appears in exactly one token, which is what makes
//! the tree lossless:
//!
//! ```
//! use markdown_context_syntax::lexer::lex;
//!
//! let input = "- [ ] see [docs](https://example.com)\n";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! Tokens are context-free. The lexer does not know whether `[` opens a link,
//! an image or a task marker; the grammar decides. Characters with syntactic
//! meaning get their own token kind and everything else is grouped into runs
//! of `TEXT`.

use logos::Logos;

use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
///
/// Separate from [`SyntaxKind`] because Logos needs to derive on it.
///
/// [`SyntaxKind`]: crate::syntax_kind::SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r"\r?\n")]
    Newline,

    #[token(">")]
    Gt,

    #[token("<")]
    Lt,

    #[token("-")]
    Dash,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("_")]
    Underscore,

    #[token("`")]
    Backtick,

    #[token("~")]
    Tilde,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("#")]
    Hash,

    #[token("!")]
    Exclaim,

    #[token(":")]
    Colon,

    #[token("^")]
    Caret,

    #[token("|")]
    Pipe,

    #[token("\"")]
    Quote,

    #[token("'")]
    Apostrophe,

    /// Plain text - anything not matched by other rules
    #[regex(r#"[^\s\[\]()<>`*+#|~!:^"'_-]+"#)]
    Text,
}

impl TokenKind {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::Lt => SyntaxKind::LT,
            TokenKind::Dash => SyntaxKind::DASH,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::Plus => SyntaxKind::PLUS,
            TokenKind::Underscore => SyntaxKind::UNDERSCORE,
            TokenKind::Backtick => SyntaxKind::BACKTICK,
            TokenKind::Tilde => SyntaxKind::TILDE,
            TokenKind::LBracket => SyntaxKind::LBRACKET,
            TokenKind::RBracket => SyntaxKind::RBRACKET,
            TokenKind::LParen => SyntaxKind::LPAREN,
            TokenKind::RParen => SyntaxKind::RPAREN,
            TokenKind::Hash => SyntaxKind::HASH,
            TokenKind::Exclaim => SyntaxKind::EXCLAIM,
            TokenKind::Colon => SyntaxKind::COLON,
            TokenKind::Caret => SyntaxKind::CARET,
            TokenKind::Pipe => SyntaxKind::PIPE,
            TokenKind::Quote => SyntaxKind::QUOTE,
            TokenKind::Apostrophe => SyntaxKind::APOSTROPHE,
            TokenKind::Text => SyntaxKind::TEXT,
        }
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        // Unrecognized characters (a lone `\r`) fall back to TEXT
        let kind = result.map_or(SyntaxKind::TEXT, TokenKind::to_syntax_kind);
        tokens.push(Token { kind, text });
    }

    tokens
}
