//! Reference definitions (`[label]: url "title"`) and label resolution.

use markdown_context_syntax::{SyntaxKind, SyntaxNode};

/// A `[label]: url` definition found in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDefinition {
    pub label: String,
    pub url: String,
    pub title_token: Option<String>,
}

/// Normalize a label for matching: case-folded with whitespace runs collapsed.
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Strip one pair of surrounding brackets, if present.
pub(crate) fn strip_brackets(text: &str) -> &str {
    let text = text.strip_prefix('[').unwrap_or(text);
    text.strip_suffix(']').unwrap_or(text)
}

/// All reference definitions in document order.
pub fn definitions(root: &SyntaxNode) -> impl Iterator<Item = ReferenceDefinition> {
    root.descendants()
        .filter(|node| node.kind() == SyntaxKind::LINK_REFERENCE)
        .filter_map(|node| definition(&node))
}

fn definition(node: &SyntaxNode) -> Option<ReferenceDefinition> {
    let mut label = None;
    let mut url = None;
    let mut title_token = None;

    for child in node.children() {
        match child.kind() {
            SyntaxKind::LINK_LABEL => {
                label = Some(strip_brackets(&child.text().to_string()).to_string());
            }
            SyntaxKind::URL => url = Some(child.text().to_string()),
            SyntaxKind::LINK_TITLE => title_token = Some(child.text().to_string()),
            _ => {}
        }
    }

    Some(ReferenceDefinition {
        label: label?,
        url: url?,
        title_token,
    })
}

/// Resolve a label to the URL of its first definition in document order.
///
/// Matching ignores case, so `[UPPER]` resolves against `[upper]: ...`.
pub fn resolve(root: &SyntaxNode, label: &str) -> Option<String> {
    let wanted = normalize_label(label);
    if wanted.is_empty() {
        return None;
    }

    definitions(root)
        .find(|def| normalize_label(&def.label) == wanted)
        .map(|def| def.url)
}
