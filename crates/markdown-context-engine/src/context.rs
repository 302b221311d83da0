//! Typed descriptions of what a cursor or selection is touching.
//!
//! Every value here is derived from one document snapshot and is stale as soon
//! as the document changes. Offsets are UTF-8 byte offsets into that snapshot.

use std::ops::Range;

use serde::Serialize;

/// Writes a markdown link span as `markdownLinkFrom` / `markdownLinkTo`,
/// leaving both out when there is none.
mod markdown_span {
    use std::ops::Range;

    use serde::ser::{SerializeMap, Serializer};

    pub fn serialize<S: Serializer>(
        span: &Option<Range<usize>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(span) = span {
            map.serialize_entry("markdownLinkFrom", &span.start)?;
            map.serialize_entry("markdownLinkTo", &span.end)?;
        }
        map.end()
    }
}

/// What a link points at, decided from the URL text alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkType {
    /// `http://` or `https://`
    External,
    /// `:/` followed by a 32 hex digit note or resource id
    Resource,
    /// `mailto:`
    Email,
    /// `#heading-anchor` within the same document
    Anchor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkContext {
    pub url: String,
    pub link_type: LinkType,
    /// Span of the URL text, or of the whole link for reference links.
    pub from: usize,
    pub to: usize,
    /// Span of the full `[text](url)`, `![alt](url)` or `<url>` construct.
    /// `None` for bare URLs, HTML images and reference links.
    #[serde(flatten, serialize_with = "markdown_span::serialize")]
    pub markdown_link: Option<Range<usize>>,
    pub is_reference_link: bool,
    /// Raw title including its delimiters, e.g. `"Title"`.
    pub title_token: Option<String>,
    pub is_image: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeContext {
    pub code: String,
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckboxContext {
    pub checked: bool,
    pub line_text: String,
    pub from: usize,
    pub to: usize,
}

/// One task line inside a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    pub line_text: String,
    pub checked: bool,
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSelectionContext {
    pub tasks: Vec<TaskInfo>,
    pub checked_count: usize,
    pub unchecked_count: usize,
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FootnoteContext {
    pub label: String,
    /// Start of the line holding the `[^label]:` definition.
    pub target_pos: usize,
    /// Span of the `[^label]` reference under the cursor.
    pub from: usize,
    pub to: usize,
}

/// One external link inside a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkInfo {
    pub url: String,
    pub link_type: LinkType,
    pub from: usize,
    pub to: usize,
    #[serde(flatten, serialize_with = "markdown_span::serialize")]
    pub markdown_link: Option<Range<usize>>,
    pub title_token: Option<String>,
}

impl From<LinkContext> for LinkInfo {
    fn from(link: LinkContext) -> Self {
        Self {
            url: link.url,
            link_type: link.link_type,
            from: link.from,
            to: link.to,
            markdown_link: link.markdown_link,
            title_token: link.title_token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSelectionContext {
    pub links: Vec<LinkInfo>,
    pub from: usize,
    pub to: usize,
}

/// A classified position or selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Context {
    Link(LinkContext),
    Code(CodeContext),
    Checkbox(CheckboxContext),
    TaskSelection(TaskSelectionContext),
    Footnote(FootnoteContext),
    LinkSelection(LinkSelectionContext),
}

/// Coarse category of a [`Context`], used to filter what a host shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    Link,
    Image,
    Code,
    Checkbox,
    TaskSelection,
    Footnote,
    LinkSelection,
}

impl Context {
    pub fn kind(&self) -> ContextKind {
        match self {
            Context::Link(link) if link.is_image => ContextKind::Image,
            Context::Link(_) => ContextKind::Link,
            Context::Code(_) => ContextKind::Code,
            Context::Checkbox(_) => ContextKind::Checkbox,
            Context::TaskSelection(_) => ContextKind::TaskSelection,
            Context::Footnote(_) => ContextKind::Footnote,
            Context::LinkSelection(_) => ContextKind::LinkSelection,
        }
    }

    /// The `from..to` span every variant carries.
    pub fn span(&self) -> Range<usize> {
        match self {
            Context::Link(c) => c.from..c.to,
            Context::Code(c) => c.from..c.to,
            Context::Checkbox(c) => c.from..c.to,
            Context::TaskSelection(c) => c.from..c.to,
            Context::Footnote(c) => c.from..c.to,
            Context::LinkSelection(c) => c.from..c.to,
        }
    }
}
