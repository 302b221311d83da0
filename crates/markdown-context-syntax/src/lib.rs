//! # markdown-context-syntax
//!
//! A lossless Markdown syntax tree using [Rowan] + [Logos], following the
//! [rust-analyzer] architecture model.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! The tree keeps every byte of the source, so any node's `text_range()` is a
//! valid byte range into the original document. The context engine relies on
//! that to turn a cursor offset into "which link, code block or task is here".
//!
//! ## Pipeline
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree
//!               (Logos)          (Grammar)        (GreenNodeBuilder)
//! ```
//!
//! ## What the tree models
//!
//! Only the constructs the context engine needs are given structure:
//!
//! - blocks: headings, blockquotes, list items and tasks, fenced and indented
//!   code, reference definitions, paragraphs
//! - inline: links, images, autolinks, bare URLs, code spans, HTML tags,
//!   emphasis
//!
//! Footnotes are left as plain tokens. Tables, setext headings
//! and multi-line inline constructs are not modelled.
//!
//! ## Quick Start
//!
//! ```
//! use markdown_context_syntax::{parse, SyntaxKind};
//!
//! let source = "- [ ] read [the docs](https://example.com)\n";
//! let tree = parse(source);
//!
//! assert_eq!(tree.text().to_string(), source);
//!
//! let url = tree
//!     .descendants()
//!     .find(|n| n.kind() == SyntaxKind::URL)
//!     .unwrap();
//! assert_eq!(url.text().to_string(), "https://example.com");
//! ```

pub mod lexer;
pub mod parser;
pub mod syntax_kind;

pub use parser::parse;
pub use syntax_kind::{MarkdownLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
