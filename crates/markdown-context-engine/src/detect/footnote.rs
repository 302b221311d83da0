//! Footnote references and their definitions.
//!
//! The tree does not model footnotes, so both halves work on raw text: the
//! reference is found on the cursor's line, and the definition by a line scan
//! that skips fenced code.

use std::sync::OnceLock;

use regex::Regex;

use crate::context::FootnoteContext;
use crate::detect::line_span;

fn reference_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\^([^\]\s]+)\]").expect("Invalid footnote regex pattern"))
}

/// Footnote context for a `[^label]` reference touching `pos`.
///
/// Brackets count as part of the reference. A reference whose definition
/// cannot be found produces nothing.
pub fn footnote_at(text: &str, pos: usize) -> Option<FootnoteContext> {
    let line = line_span(text, pos);
    let line_text = &text[line.clone()];

    for captures in reference_regex().captures_iter(line_text) {
        let (Some(whole), Some(label)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let from = line.start + whole.start();
        let to = line.start + whole.end();
        if pos < from || pos > to {
            continue;
        }

        let label = label.as_str();
        match find_definition(text, label) {
            Some(target_pos) => {
                return Some(FootnoteContext {
                    label: label.to_string(),
                    target_pos,
                    from,
                    to,
                });
            }
            None => log::debug!("footnote [^{label}] has no definition"),
        }
    }

    None
}

/// Offset of the first line defining `[^label]:` outside fenced code.
///
/// Lines starting with ```` ``` ```` or `~~~` toggle the fenced state. The
/// label matches case-insensitively.
pub fn find_definition(text: &str, label: &str) -> Option<usize> {
    let pattern = format!(r"(?i)^ {{0,3}}\[\^{}\]:", regex::escape(label));
    let definition = Regex::new(&pattern).ok()?;

    let mut in_code = false;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_code = !in_code;
        } else if !in_code && definition.is_match(line) {
            return Some(offset);
        }
        offset += line.len();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const DOC: &str = "Claim[^1] and more[^note].\n\n[^1]: First.\n[^NOTE]: Second.\n";

    #[rstest]
    #[case(5, Some("1"))]
    #[case(7, Some("1"))]
    #[case(9, Some("1"))]
    #[case(4, None)]
    #[case(20, Some("note"))]
    #[case(0, None)]
    fn reference_under_cursor(#[case] pos: usize, #[case] expected: Option<&str>) {
        let found = footnote_at(DOC, pos);
        assert_eq!(found.as_ref().map(|f| f.label.as_str()), expected);
    }

    #[test]
    fn context_points_at_definition_line() {
        let found = footnote_at(DOC, 6).unwrap();
        assert_eq!(
            found,
            FootnoteContext {
                label: "1".to_string(),
                target_pos: 28,
                from: 5,
                to: 9,
            }
        );
        assert!(DOC[found.target_pos..].starts_with("[^1]:"));
    }

    #[test]
    fn definition_matches_case_insensitively() {
        let pos = DOC.find("[^NOTE]").unwrap();
        assert_eq!(find_definition(DOC, "note"), Some(pos));
    }

    #[test]
    fn definitions_inside_fences_are_ignored() {
        let only_in_code = "Ref[^1]\n\n```\n[^1]: hidden\n```\n";
        assert_eq!(find_definition(only_in_code, "1"), None);
        assert_eq!(footnote_at(only_in_code, 4), None);

        let both = "Ref[^1]\n\n~~~\n[^1]: hidden\n~~~\n\n[^1]: real\n";
        let real = both.rfind("[^1]: real").unwrap();
        assert_eq!(find_definition(both, "1"), Some(real));
    }

    #[test]
    fn labels_with_regex_metacharacters() {
        let text = "x[^a.b]\n\n[^a.b]: ok\n[^axb]: wrong\n";
        assert_eq!(find_definition(text, "a.b"), text.find("[^a.b]: ok"));
        assert_eq!(find_definition(text, "a+b"), None);
    }

    #[test]
    fn indented_definition_up_to_three_spaces() {
        assert_eq!(find_definition("   [^x]: y\n", "x"), Some(0));
        assert_eq!(find_definition("    [^x]: y\n", "x"), None);
    }
}
