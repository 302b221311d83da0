use std::ops::Range;

use xi_rope::delta::DeltaElement;
use xi_rope::{Delta, RopeInfo};

use crate::detect::Selection;

/// Result of applying one edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Byte ranges of inserted text, in post-edit offsets
    pub changed: Vec<Range<usize>>,
    pub new_selection: Selection,
    pub version: u64,
}

/// Ranges of inserted text in the document the delta produces.
pub(crate) fn changed_ranges(delta: &Delta<RopeInfo>) -> Vec<Range<usize>> {
    let mut changed = Vec::new();
    let mut cursor = 0;
    for op in delta.els.iter() {
        match op {
            DeltaElement::Copy(from, to) => {
                cursor += to - from;
            }
            DeltaElement::Insert(inserted) => {
                let start = cursor;
                let end = cursor + inserted.len();
                changed.push(start..end);
                cursor = end;
            }
        }
    }
    changed
}
