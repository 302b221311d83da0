//! Replacements built from detected contexts.
//!
//! Command handlers should never compute offsets themselves. Each builder
//! here turns a context into [`Replacement`]s whose expected text is what the
//! context saw, so a stale context fails the guard instead of corrupting the
//! document.

use std::ops::Range;

use thiserror::Error;

use crate::context::{
    CheckboxContext, Context, LinkContext, LinkInfo, LinkSelectionContext, TaskSelectionContext,
};
use crate::detect::checkbox;
use crate::editing::replace::Replacement;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("reference-style links have no inline URL to rewrite")]
    ReferenceLink,

    #[error("context is not a link")]
    NotALink,

    #[error("image has no markdown span to rewrite")]
    MissingMarkdownSpan,

    #[error("line has no checkbox")]
    NoCheckbox,

    #[error("context span {from}..{to} does not fit the document")]
    StaleContext { from: usize, to: usize },
}

/// Flip a checkbox line between `[ ]` and `[x]`.
pub fn toggle_checkbox(context: &CheckboxContext) -> Result<Replacement, EditError> {
    let line = checkbox::with_state(&context.line_text, !context.checked)
        .ok_or(EditError::NoCheckbox)?;
    Ok(Replacement::new(context.from, context.to, line).expecting(context.line_text.clone()))
}

/// One replacement per task whose state differs from `checked`.
pub fn set_tasks(selection: &TaskSelectionContext, checked: bool) -> Vec<Replacement> {
    selection
        .tasks
        .iter()
        .filter(|task| task.checked != checked)
        .filter_map(|task| {
            let line = checkbox::with_state(&task.line_text, checked)?;
            Some(Replacement::new(task.from, task.to, line).expecting(task.line_text.clone()))
        })
        .collect()
}

/// Check every task, or uncheck them all if they already are.
pub fn toggle_tasks(selection: &TaskSelectionContext) -> Vec<Replacement> {
    set_tasks(selection, selection.unchecked_count > 0)
}

/// Escape characters that would end or nest link text.
pub fn escape_link_text(title: &str) -> String {
    let mut escaped = String::with_capacity(title.len());
    for c in title.chars() {
        if matches!(c, '\\' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Link destination, wrapped in `<...>` when it would not parse bare.
fn format_destination(url: &str) -> String {
    let depth = url.chars().try_fold(0usize, |depth, c| match c {
        '(' => Some(depth + 1),
        ')' => depth.checked_sub(1),
        _ => Some(depth),
    });
    let bare = !url.is_empty() && depth == Some(0) && !url.contains(char::is_whitespace);

    if bare {
        url.to_string()
    } else {
        format!("<{url}>")
    }
}

/// Parts of a link needed to rewrite it.
struct LinkParts<'a> {
    url: &'a str,
    url_span: Range<usize>,
    markdown_link: Option<Range<usize>>,
    title_token: Option<&'a str>,
    is_image: bool,
}

fn rewrite_link(text: &str, link: LinkParts<'_>, title: &str) -> Result<Replacement, EditError> {
    let span = match link.markdown_link {
        Some(span) => span,
        None if link.is_image => return Err(EditError::MissingMarkdownSpan),
        None => link.url_span,
    };
    let expected = text
        .get(span.clone())
        .ok_or(EditError::StaleContext {
            from: span.start,
            to: span.end,
        })?;

    let mut markdown = String::new();
    if link.is_image {
        markdown.push('!');
    }
    markdown.push('[');
    markdown.push_str(&escape_link_text(title));
    markdown.push_str("](");
    markdown.push_str(&format_destination(link.url));
    if let Some(token) = link.title_token {
        markdown.push(' ');
        markdown.push_str(token);
    }
    markdown.push(')');

    Ok(Replacement::new(span.start, span.end, markdown).expecting(expected))
}

/// Rewrite a link as `[title](url)`, keeping its title token.
///
/// Bare URLs and autolinks become inline links. Images keep their `!`.
/// `text` must be the snapshot the link was detected in, since the span's
/// current contents become the expected text.
pub fn set_link_title(
    text: &str,
    link: &LinkContext,
    title: &str,
) -> Result<Replacement, EditError> {
    if link.is_reference_link {
        return Err(EditError::ReferenceLink);
    }

    rewrite_link(
        text,
        LinkParts {
            url: &link.url,
            url_span: link.from..link.to,
            markdown_link: link.markdown_link.clone(),
            title_token: link.title_token.as_deref(),
            is_image: link.is_image,
        },
        title,
    )
}

/// [`set_link_title`] for any context, failing for non-links.
pub fn set_context_link_title(
    text: &str,
    context: &Context,
    title: &str,
) -> Result<Replacement, EditError> {
    match context {
        Context::Link(link) => set_link_title(text, link, title),
        _ => Err(EditError::NotALink),
    }
}

fn link_info_replacement(text: &str, link: &LinkInfo, title: &str) -> Result<Replacement, EditError> {
    rewrite_link(
        text,
        LinkParts {
            url: &link.url,
            url_span: link.from..link.to,
            markdown_link: link.markdown_link.clone(),
            title_token: link.title_token.as_deref(),
            is_image: false,
        },
        title,
    )
}

/// Rewrite every selected link that has a title available.
///
/// Links for which `title_for` returns `None` are left untouched.
pub fn links_to_markdown(
    text: &str,
    selection: &LinkSelectionContext,
    mut title_for: impl FnMut(&LinkInfo) -> Option<String>,
) -> Vec<Replacement> {
    selection
        .links
        .iter()
        .filter_map(|link| {
            let title = title_for(link)?;
            match link_info_replacement(text, link, &title) {
                Ok(replacement) => Some(replacement),
                Err(err) => {
                    log::warn!("skipping link {}: {err}", link.url);
                    None
                }
            }
        })
        .collect()
}
