//! SyntaxKind enum for all tokens and nodes in the Markdown CST.
//!
//! Tokens and nodes share a single enum. Every byte in the source appears as a
//! token somewhere in the tree.

/// All syntax kinds for the Markdown CST.
///
/// The `repr(u16)` keeps the kind compact inside rowan's green tree.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens (lexer output) ===
    /// Horizontal whitespace (spaces, tabs)
    WHITESPACE,
    /// Line ending
    NEWLINE,
    /// Plain text content
    TEXT,
    /// `>` for blockquotes and autolinks
    GT,
    /// `<` for autolinks and HTML tags
    LT,
    /// `-` for lists and thematic breaks
    DASH,
    /// `*` for lists, emphasis and thematic breaks
    STAR,
    /// `+` for lists
    PLUS,
    /// `_` for emphasis
    UNDERSCORE,
    /// Single backtick for code spans and fences
    BACKTICK,
    /// `~` for fenced code and strikethrough
    TILDE,
    /// `[` for links, images and task markers
    LBRACKET,
    /// `]` for links, images and task markers
    RBRACKET,
    /// `(` for link destinations
    LPAREN,
    /// `)` for link destinations
    RPAREN,
    /// `#` for headings
    HASH,
    /// `!` introducing images
    EXCLAIM,
    /// `:` after reference labels and URL schemes
    COLON,
    /// `^` introducing footnote labels
    CARET,
    /// `|` for tables
    PIPE,
    /// `"` delimiting link titles
    QUOTE,
    /// `'` delimiting link titles
    APOSTROPHE,
    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root document node
    ROOT,
    /// Blockquote container (`> ...`)
    BLOCK_QUOTE,
    /// Individual list item line
    LIST_ITEM,
    /// The `-`, `*` or `+` bullet of a list item
    LIST_MARKER,
    /// Task item body, from the task marker to the end of the line
    TASK,
    /// `[ ]`, `[x]` or `[X]`
    TASK_MARKER,
    /// Paragraph block
    PARAGRAPH,
    /// ATX heading (`# ...`)
    HEADING,
    /// Thematic break (`---`, `***`, etc.)
    THEMATIC_BREAK,
    /// Fenced code block
    FENCED_CODE,
    /// Indented code block
    INDENTED_CODE,
    /// Run of fence characters opening or closing a fenced block
    CODE_FENCE,
    /// Info string after an opening fence
    CODE_INFO,
    /// Code payload inside a code block
    CODE_TEXT,
    /// Reference definition `[label]: url "title"`
    LINK_REFERENCE,
    /// Inline code span
    CODE_SPAN,
    /// Standard link `[text](url)` or reference link `[text][label]`
    LINK,
    /// Image `![alt](url)`
    IMAGE,
    /// Autolink `<scheme:...>`
    AUTOLINK,
    /// Link destination, autolink target or bare URL
    URL,
    /// Link title including its delimiters
    LINK_TITLE,
    /// Reference label including its brackets
    LINK_LABEL,
    /// Bracketed link text including its brackets
    LINK_TEXT,
    /// Inline HTML tag
    HTML_TAG,
    /// Emphasis `*text*`
    EMPHASIS,
    /// Strong emphasis `**text**`
    STRONG,
    /// Strikethrough `~~text~~`
    STRIKETHROUGH,
    /// Bracket run that did not form a link
    INLINE,

    /// Error recovery node
    ERROR,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token (lexer output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true if this kind is trivia (whitespace/newlines).
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEWLINE)
    }

    /// Returns true for block-level code containers.
    pub fn is_code_block(self) -> bool {
        matches!(self, Self::FENCED_CODE | Self::INDENTED_CODE)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkdownLang {}

impl rowan::Language for MarkdownLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ERROR as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<MarkdownLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<MarkdownLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<MarkdownLang>;
