//! Expected-text guarded replacement.
//!
//! A context is only valid against the snapshot it came from. Replacements
//! carry the text the caller saw at detection time, and nothing is applied
//! unless every range still holds exactly that text.
//!
//! A batch is validated in full before anything is built, then compiled into
//! one [`Delta`] so offsets of later entries never shift under earlier ones.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

/// Replace `from..to` with `text`, optionally only if the range still reads
/// `expected_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Replacement {
    pub from: usize,
    pub to: usize,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_text: Option<String>,
}

impl Replacement {
    pub fn new(from: usize, to: usize, text: impl Into<String>) -> Self {
        Self {
            from,
            to,
            text: text.into(),
            expected_text: None,
        }
    }

    pub fn expecting(mut self, expected: impl Into<String>) -> Self {
        self.expected_text = Some(expected.into());
        self
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplaceError {
    #[error("invalid range {from}..{to}: start is after end")]
    InvalidRange { from: usize, to: usize },

    #[error("range {from}..{to} is outside the document (length {len})")]
    OutOfBounds { from: usize, to: usize, len: usize },

    #[error("offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },

    #[error("entry {index} no longer matches its expected text")]
    ExpectedTextMismatch { index: usize },

    #[error("entries {first} and {second} overlap")]
    Overlapping { first: usize, second: usize },

    #[error("batch has no entries")]
    EmptyBatch,
}

/// Check one entry against the current text.
fn validate(text: &str, entry: &Replacement, index: usize) -> Result<(), ReplaceError> {
    let Replacement { from, to, .. } = *entry;

    if from > to {
        return Err(ReplaceError::InvalidRange { from, to });
    }
    if to > text.len() {
        return Err(ReplaceError::OutOfBounds {
            from,
            to,
            len: text.len(),
        });
    }
    for offset in [from, to] {
        if !text.is_char_boundary(offset) {
            return Err(ReplaceError::NotCharBoundary { offset });
        }
    }
    if let Some(expected) = &entry.expected_text {
        if text[from..to] != *expected {
            return Err(ReplaceError::ExpectedTextMismatch { index });
        }
    }

    Ok(())
}

/// Compile a single replacement into a delta over `text`.
pub fn compile_replacement(
    text: &str,
    replacement: &Replacement,
) -> Result<Delta<RopeInfo>, ReplaceError> {
    compile_batch(text, std::slice::from_ref(replacement))
}

/// Compile a batch into one delta, or fail without building anything.
///
/// Entries may come in any order. Adjacent ranges and several insertions at
/// the same offset are fine; ranges sharing bytes are rejected.
pub fn compile_batch(
    text: &str,
    entries: &[Replacement],
) -> Result<Delta<RopeInfo>, ReplaceError> {
    if entries.is_empty() {
        return Err(ReplaceError::EmptyBatch);
    }

    for (index, entry) in entries.iter().enumerate() {
        validate(text, entry, index)?;
    }

    // Stable, so insertions at one offset keep their given order
    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by_key(|&i| entries[i].from);

    for pair in order.windows(2) {
        let (first, second) = (pair[0], pair[1]);
        if entries[second].from < entries[first].to {
            return Err(ReplaceError::Overlapping { first, second });
        }
    }

    let mut builder = Builder::new(text.len());
    for &i in &order {
        let entry = &entries[i];
        builder.replace(entry.from..entry.to, Rope::from(entry.text.as_str()));
    }

    Ok(builder.build())
}

/// Apply a batch to a plain string.
pub fn apply_to_text(text: &str, entries: &[Replacement]) -> Result<String, ReplaceError> {
    let delta = compile_batch(text, entries)?;
    Ok(delta.apply(&Rope::from(text)).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn single_replacement_with_matching_expected_text() {
        let text = "- [ ] Task";
        let entry = Replacement::new(0, 10, "- [x] Task").expecting("- [ ] Task");
        assert_eq!(apply_to_text(text, &[entry]).unwrap(), "- [x] Task");
    }

    #[test]
    fn stale_expected_text_is_rejected() {
        let entry = Replacement::new(0, 5, "HELLO").expecting("howdy");
        assert_eq!(
            apply_to_text("hello world", &[entry]),
            Err(ReplaceError::ExpectedTextMismatch { index: 0 })
        );
    }

    #[test]
    fn batch_is_all_or_nothing() {
        let text = "one two three";
        let entries = [
            Replacement::new(0, 3, "1").expecting("one"),
            Replacement::new(4, 7, "2").expecting("TWO"),
        ];
        assert_eq!(
            compile_batch(text, &entries).unwrap_err(),
            ReplaceError::ExpectedTextMismatch { index: 1 }
        );
    }

    #[test]
    fn batch_offsets_refer_to_the_original_text() {
        let text = "aaa bbb ccc";
        let entries = [
            Replacement::new(8, 11, "third").expecting("ccc"),
            Replacement::new(0, 3, "first").expecting("aaa"),
            Replacement::new(4, 7, "").expecting("bbb"),
        ];
        assert_eq!(apply_to_text(text, &entries).unwrap(), "first  third");
    }

    #[test]
    fn insertions_at_one_offset_keep_their_order() {
        let entries = [Replacement::new(1, 1, "x"), Replacement::new(1, 1, "y")];
        assert_eq!(apply_to_text("ab", &entries).unwrap(), "axyb");
    }

    #[test]
    fn adjacent_ranges_are_allowed() {
        let entries = [Replacement::new(0, 2, "X"), Replacement::new(2, 4, "Y")];
        assert_eq!(apply_to_text("abcd", &entries).unwrap(), "XY");
    }

    #[rstest]
    #[case(Replacement::new(3, 1, ""), ReplaceError::InvalidRange { from: 3, to: 1 })]
    #[case(Replacement::new(0, 99, ""), ReplaceError::OutOfBounds { from: 0, to: 99, len: 6 })]
    #[case(Replacement::new(2, 2, "x"), ReplaceError::NotCharBoundary { offset: 2 })]
    fn malformed_ranges(#[case] entry: Replacement, #[case] expected: ReplaceError) {
        assert_eq!(compile_replacement("aé€", &entry).unwrap_err(), expected);
    }

    #[test]
    fn overlapping_entries_are_rejected() {
        let entries = [Replacement::new(2, 6, "x"), Replacement::new(0, 3, "y")];
        assert_eq!(
            compile_batch("abcdefgh", &entries).unwrap_err(),
            ReplaceError::Overlapping { first: 1, second: 0 }
        );
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert_eq!(compile_batch("abc", &[]).unwrap_err(), ReplaceError::EmptyBatch);
    }

    #[test]
    fn multibyte_text_is_replaced_by_bytes() {
        let text = "café ☕ bar";
        let from = text.find('☕').unwrap();
        let entry = Replacement::new(from, from + '☕'.len_utf8(), "tea").expecting("☕");
        assert_eq!(apply_to_text(text, &[entry]).unwrap(), "café tea bar");
    }

    #[test]
    fn replacement_json_shape() {
        let entry: Replacement =
            serde_json::from_str(r#"{"from":1,"to":2,"text":"x","expectedText":"b"}"#).unwrap();
        assert_eq!(entry, Replacement::new(1, 2, "x").expecting("b"));
    }
}
