//! Task checkboxes.

use std::ops::Range;
use std::sync::OnceLock;

use markdown_context_syntax::{SyntaxKind, SyntaxNode};
use regex::Regex;

use crate::context::CheckboxContext;
use crate::detect::{Snapshot, line_span, node_span};

fn checkbox_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\s*[-*+]\s+)\[([x ])\]").expect("Invalid checkbox regex pattern")
    })
}

/// Checked state of a task line, or `None` if the line has no checkbox.
///
/// Only lowercase `x` counts as checked; `[X]` is not recognised.
pub fn parse_checkbox_line(line: &str) -> Option<bool> {
    checkbox_regex()
        .captures(line)
        .and_then(|captures| captures.get(2))
        .map(|state| state.as_str() == "x")
}

/// Byte range of the state character (` ` or `x`) within a checkbox line.
pub fn state_range(line: &str) -> Option<Range<usize>> {
    checkbox_regex()
        .captures(line)
        .and_then(|captures| captures.get(2))
        .map(|state| state.range())
}

/// Rewrite a checkbox line to the given state.
pub fn with_state(line: &str, checked: bool) -> Option<String> {
    let range = state_range(line)?;
    let mut updated = line.to_string();
    updated.replace_range(range, if checked { "x" } else { " " });
    Some(updated)
}

/// List items with a task child, i.e. lines the tree recognised as tasks.
pub(crate) fn is_task_item(node: &SyntaxNode) -> bool {
    node.kind() == SyntaxKind::LIST_ITEM
        && node.children().any(|child| child.kind() == SyntaxKind::TASK)
}

/// Checkbox context for the line at `pos`.
///
/// Gated on the tree: the line must start a task list item, so `- [ ]` text
/// inside code blocks never matches.
pub fn checkbox_at(snapshot: &Snapshot<'_>, pos: usize) -> Option<CheckboxContext> {
    let line = line_span(snapshot.text, pos);

    let gated = snapshot
        .enclosing_nodes(pos)
        .iter()
        .any(|node| is_task_item(node) && node_span(node).start == line.start);
    if !gated {
        return None;
    }

    let line_text = &snapshot.text[line.clone()];
    let checked = parse_checkbox_line(line_text)?;
    Some(CheckboxContext {
        checked,
        line_text: line_text.to_string(),
        from: line.start,
        to: line.end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_context_syntax::parse;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn checkbox(text: &str, pos: usize) -> Option<CheckboxContext> {
        let tree = parse(text);
        checkbox_at(&Snapshot::new(text, &tree), pos)
    }

    #[rstest]
    #[case("- [ ] Task", Some(false))]
    #[case("- [x] Task", Some(true))]
    #[case("* [ ] Task", Some(false))]
    #[case("+ [x] Task", Some(true))]
    #[case("    - [ ] nested", Some(false))]
    #[case("- [X] Task", None)]
    #[case("- [] Task", None)]
    #[case("1. [ ] Task", None)]
    #[case("[ ] Task", None)]
    fn line_patterns(#[case] line: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_checkbox_line(line), expected);
    }

    #[test]
    fn every_offset_on_the_line_matches() {
        let text = "- [ ] Task";
        for pos in 0..=text.len() {
            assert_eq!(
                checkbox(text, pos),
                Some(CheckboxContext {
                    checked: false,
                    line_text: "- [ ] Task".to_string(),
                    from: 0,
                    to: 10,
                }),
                "offset {pos}"
            );
        }
    }

    #[test]
    fn task_text_in_code_block_is_not_a_checkbox() {
        let text = "```\n- [ ] Task\n```\n";
        let pos = text.find("Task").unwrap();
        assert_eq!(checkbox(text, pos), None);
    }

    #[test]
    fn task_text_in_indented_code_is_not_a_checkbox() {
        let text = "Example markdown:\n\n    - [ ] literal\n    - [x] text\n";
        for needle in ["literal", "text\n"] {
            let pos = text.find(needle).unwrap();
            assert_eq!(checkbox(text, pos), None, "at {needle:?}");
        }
    }

    #[test]
    fn second_line_of_a_list() {
        let text = "- [x] one\n  - [ ] two\n";
        let found = checkbox(text, text.find("two").unwrap()).unwrap();
        assert!(!found.checked);
        assert_eq!(found.line_text, "  - [ ] two");
        assert_eq!(found.from, 10);
    }

    #[test]
    fn uppercase_marker_is_a_task_without_checkbox() {
        assert_eq!(checkbox("- [X] shouted\n", 3), None);
    }

    #[test]
    fn rewriting_state() {
        assert_eq!(with_state("- [ ] a", true).as_deref(), Some("- [x] a"));
        assert_eq!(with_state("  * [x] b", false).as_deref(), Some("  * [ ] b"));
        assert_eq!(with_state("plain", true), None);
    }
}
