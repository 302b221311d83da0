//! Batch contexts for a non-empty selection.

use std::collections::HashSet;
use std::ops::Range;

use markdown_context_syntax::SyntaxKind;

use crate::context::{
    Context, LinkInfo, LinkSelectionContext, LinkType, TaskInfo, TaskSelectionContext,
};
use crate::detect::checkbox::{is_task_item, parse_checkbox_line};
use crate::detect::{Snapshot, line_span, link, node_span};

/// Task and external-link contexts for `range`, task selection first.
///
/// Empty when the selection touches neither.
pub fn selection_contexts(snapshot: &Snapshot<'_>, range: Range<usize>) -> Vec<Context> {
    let mut contexts = Vec::new();

    if let Some(tasks) = task_selection(snapshot, range.clone()) {
        contexts.push(Context::TaskSelection(tasks));
    }
    if let Some(links) = link_selection(snapshot, range) {
        contexts.push(Context::LinkSelection(links));
    }

    contexts
}

/// Every task line the selection touches, one entry per line.
pub fn task_selection(
    snapshot: &Snapshot<'_>,
    range: Range<usize>,
) -> Option<TaskSelectionContext> {
    let mut seen_lines = HashSet::new();
    let mut tasks = Vec::new();

    for item in snapshot.overlapping_nodes(range.clone(), &[SyntaxKind::LIST_ITEM]) {
        if !is_task_item(&item) {
            continue;
        }

        let line = line_span(snapshot.text, node_span(&item).start);
        if !seen_lines.insert(line.start) {
            continue;
        }

        let line_text = &snapshot.text[line.clone()];
        if let Some(checked) = parse_checkbox_line(line_text) {
            tasks.push(TaskInfo {
                line_text: line_text.to_string(),
                checked,
                from: line.start,
                to: line.end,
            });
        }
    }

    if tasks.is_empty() {
        return None;
    }

    let checked_count = tasks.iter().filter(|task| task.checked).count();
    Some(TaskSelectionContext {
        unchecked_count: tasks.len() - checked_count,
        checked_count,
        tasks,
        from: range.start,
        to: range.end,
    })
}

/// Distinct external links in the selection.
///
/// Images and reference-style links are left out since neither has a URL
/// that can be rewritten in place.
pub fn link_selection(
    snapshot: &Snapshot<'_>,
    range: Range<usize>,
) -> Option<LinkSelectionContext> {
    const LINK_KINDS: &[SyntaxKind] = &[SyntaxKind::LINK, SyntaxKind::URL, SyntaxKind::AUTOLINK];

    let mut seen_spans = HashSet::new();
    let mut links = Vec::new();

    for node in snapshot.overlapping_nodes(range.clone(), LINK_KINDS) {
        let Some(found) = link::link_context(snapshot.tree, &node) else {
            continue;
        };
        if found.link_type != LinkType::External || found.is_reference_link || found.is_image {
            continue;
        }
        if seen_spans.insert(found.from..found.to) {
            links.push(LinkInfo::from(found));
        }
    }

    if links.is_empty() {
        return None;
    }

    Some(LinkSelectionContext {
        links,
        from: range.start,
        to: range.end,
    })
}
