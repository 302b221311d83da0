//! # Parser Events
//!
//! The grammar never builds tree nodes directly. It emits a flat sequence of
//! events which the [`Sink`](super::sink::Sink) replays into a rowan tree:
//!
//! ```text
//! Start(LINK)
//!   Start(LINK_TEXT) Token(LBRACKET) Token(TEXT) Token(RBRACKET) Finish
//!   Token(LPAREN)
//!   Start(URL) Token(TEXT) Finish
//!   Token(RPAREN)
//! Finish
//! ```
//!
//! Speculative nodes are reserved with a `Placeholder`. A placeholder that is
//! abandoned after other events were pushed stays inert and the Sink skips it.

use crate::syntax_kind::SyntaxKind;

/// An event emitted by the parser during tree construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a new composite node.
    Start { kind: SyntaxKind },

    /// Add one lexer token to the current node.
    Token { kind: SyntaxKind },

    /// Finish the current node.
    Finish,

    /// A reserved slot that was never completed.
    Placeholder,
}

impl Event {
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start { kind }
    }

    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token { kind }
    }
}
