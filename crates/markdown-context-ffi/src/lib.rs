//! UniFFI bindings for editor hosts
//!
//! Exposes the context menu operations to a native shell: query contexts at
//! the cursor, apply guarded replacements, and scroll to a position. Offsets
//! are UTF-8 byte offsets and cross the boundary as `u64`.

use markdown_context_engine::{
    Context, Editor, LinkContext, LinkInfo, LinkType, Replacement, TaskInfo,
};
use std::sync::{Mutex, MutexGuard};

uniffi::setup_scaffolding!();

/// Offsets past `usize::MAX` are out of range for any document, so
/// saturating keeps them rejected (or clamped) downstream.
fn to_offset(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn from_offset(value: usize) -> u64 {
    value as u64
}

// ============ Editor Handle ============

/// An open document with its selection.
#[derive(uniffi::Object)]
pub struct EditorHandle {
    inner: Mutex<Editor>,
}

impl EditorHandle {
    fn editor(&self) -> MutexGuard<'_, Editor> {
        // Recover from poisoned mutex (another thread panicked while holding lock)
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[uniffi::export]
impl EditorHandle {
    #[uniffi::constructor]
    pub fn from_string(content: String) -> Self {
        Self {
            inner: Mutex::new(Editor::from_text(&content)),
        }
    }

    pub fn get_text(&self) -> String {
        self.editor().text()
    }

    /// Incremented by every successful edit.
    pub fn get_version(&self) -> u64 {
        self.editor().version()
    }

    pub fn set_selection(&self, anchor: u64, head: u64) {
        self.editor().set_selection(to_offset(anchor), to_offset(head));
    }

    /// Contexts for the current selection, in menu order.
    pub fn get_contexts_at_cursor(&self) -> Vec<ContextDto> {
        self.editor()
            .get_contexts_at_cursor()
            .into_iter()
            .map(ContextDto::from_engine)
            .collect()
    }

    /// Replace `from..to` with `text`. With `expected_text`, nothing happens
    /// unless the range still holds exactly that text.
    pub fn replace_range(
        &self,
        text: String,
        from: u64,
        to: u64,
        expected_text: Option<String>,
    ) -> bool {
        self.editor().replace_range(
            &text,
            to_offset(from),
            to_offset(to),
            expected_text.as_deref(),
        )
    }

    /// Apply all entries as one edit, or none of them.
    pub fn batch_replace(&self, entries: Vec<BatchEntryDto>) -> bool {
        let entries: Vec<Replacement> = entries.into_iter().map(BatchEntryDto::into_engine).collect();
        self.editor().batch_replace(&entries)
    }

    /// Move the cursor to `pos`, e.g. a footnote definition.
    pub fn scroll_to_position(&self, pos: u64) {
        let mut editor = self.editor();
        editor.scroll_to_position(to_offset(pos));
        log::debug!("scroll target {:?}", editor.scroll_target());
    }

    /// Offset the host should scroll to, if one was requested.
    pub fn get_scroll_target(&self) -> Option<u64> {
        self.editor().scroll_target().map(from_offset)
    }
}

// ============ DTOs ============

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct BatchEntryDto {
    pub from: u64,
    pub to: u64,
    pub text: String,
    pub expected_text: Option<String>,
}

impl BatchEntryDto {
    fn into_engine(self) -> Replacement {
        Replacement {
            from: to_offset(self.from),
            to: to_offset(self.to),
            text: self.text,
            expected_text: self.expected_text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum LinkTypeDto {
    External,
    Resource,
    Email,
    Anchor,
}

impl From<LinkType> for LinkTypeDto {
    fn from(link_type: LinkType) -> Self {
        match link_type {
            LinkType::External => Self::External,
            LinkType::Resource => Self::Resource,
            LinkType::Email => Self::Email,
            LinkType::Anchor => Self::Anchor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct LinkDto {
    pub url: String,
    pub link_type: LinkTypeDto,
    pub from: u64,
    pub to: u64,
    pub markdown_link_from: Option<u64>,
    pub markdown_link_to: Option<u64>,
    pub is_reference_link: bool,
    pub title_token: Option<String>,
    pub is_image: bool,
}

impl LinkDto {
    fn from_engine(link: LinkContext) -> Self {
        Self {
            url: link.url,
            link_type: link.link_type.into(),
            from: from_offset(link.from),
            to: from_offset(link.to),
            markdown_link_from: link.markdown_link.as_ref().map(|r| from_offset(r.start)),
            markdown_link_to: link.markdown_link.as_ref().map(|r| from_offset(r.end)),
            is_reference_link: link.is_reference_link,
            title_token: link.title_token,
            is_image: link.is_image,
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct LinkInfoDto {
    pub url: String,
    pub link_type: LinkTypeDto,
    pub from: u64,
    pub to: u64,
    pub markdown_link_from: Option<u64>,
    pub markdown_link_to: Option<u64>,
    pub title_token: Option<String>,
}

impl LinkInfoDto {
    fn from_engine(link: LinkInfo) -> Self {
        Self {
            url: link.url,
            link_type: link.link_type.into(),
            from: from_offset(link.from),
            to: from_offset(link.to),
            markdown_link_from: link.markdown_link.as_ref().map(|r| from_offset(r.start)),
            markdown_link_to: link.markdown_link.as_ref().map(|r| from_offset(r.end)),
            title_token: link.title_token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct TaskInfoDto {
    pub line_text: String,
    pub checked: bool,
    pub from: u64,
    pub to: u64,
}

impl TaskInfoDto {
    fn from_engine(task: TaskInfo) -> Self {
        Self {
            line_text: task.line_text,
            checked: task.checked,
            from: from_offset(task.from),
            to: from_offset(task.to),
        }
    }
}

/// One detected context. Mirrors the engine's `Context`.
#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum ContextDto {
    Link {
        link: LinkDto,
    },
    Code {
        code: String,
        from: u64,
        to: u64,
    },
    Checkbox {
        checked: bool,
        line_text: String,
        from: u64,
        to: u64,
    },
    TaskSelection {
        tasks: Vec<TaskInfoDto>,
        checked_count: u64,
        unchecked_count: u64,
        from: u64,
        to: u64,
    },
    Footnote {
        label: String,
        target_pos: u64,
        from: u64,
        to: u64,
    },
    LinkSelection {
        links: Vec<LinkInfoDto>,
        from: u64,
        to: u64,
    },
}

impl ContextDto {
    fn from_engine(context: Context) -> Self {
        match context {
            Context::Link(link) => Self::Link {
                link: LinkDto::from_engine(link),
            },
            Context::Code(code) => Self::Code {
                code: code.code,
                from: from_offset(code.from),
                to: from_offset(code.to),
            },
            Context::Checkbox(checkbox) => Self::Checkbox {
                checked: checkbox.checked,
                line_text: checkbox.line_text,
                from: from_offset(checkbox.from),
                to: from_offset(checkbox.to),
            },
            Context::TaskSelection(selection) => Self::TaskSelection {
                tasks: selection
                    .tasks
                    .into_iter()
                    .map(TaskInfoDto::from_engine)
                    .collect(),
                checked_count: from_offset(selection.checked_count),
                unchecked_count: from_offset(selection.unchecked_count),
                from: from_offset(selection.from),
                to: from_offset(selection.to),
            },
            Context::Footnote(footnote) => Self::Footnote {
                label: footnote.label,
                target_pos: from_offset(footnote.target_pos),
                from: from_offset(footnote.from),
                to: from_offset(footnote.to),
            },
            Context::LinkSelection(selection) => Self::LinkSelection {
                links: selection
                    .links
                    .into_iter()
                    .map(LinkInfoDto::from_engine)
                    .collect(),
                from: from_offset(selection.from),
                to: from_offset(selection.to),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_editor_from_string() {
        let content = "# Hello World\n\n- [ ] Item 1";
        let editor = EditorHandle::from_string(content.to_string());
        assert_eq!(editor.get_text(), content);
        assert_eq!(editor.get_version(), 0);
    }

    #[test]
    fn test_code_and_checkbox_contexts() {
        let editor = EditorHandle::from_string("- [ ] `ls -la`".to_string());
        editor.set_selection(9, 9);

        assert_eq!(
            editor.get_contexts_at_cursor(),
            vec![
                ContextDto::Code {
                    code: "ls -la".to_string(),
                    from: 6,
                    to: 14,
                },
                ContextDto::Checkbox {
                    checked: false,
                    line_text: "- [ ] `ls -la`".to_string(),
                    from: 0,
                    to: 14,
                },
            ]
        );
    }

    #[test]
    fn test_link_offsets_cross_as_u64() {
        let editor = EditorHandle::from_string("[docs](https://d.io)".to_string());
        editor.set_selection(2, 2);

        let contexts = editor.get_contexts_at_cursor();
        let [ContextDto::Link { link }] = contexts.as_slice() else {
            panic!("expected a link, got {contexts:?}");
        };
        assert_eq!(link.link_type, LinkTypeDto::External);
        assert_eq!((link.from, link.to), (7, 19));
        assert_eq!(
            (link.markdown_link_from, link.markdown_link_to),
            (Some(0), Some(20))
        );
    }

    #[test]
    fn test_replace_range_guard() {
        let editor = EditorHandle::from_string("- [ ] Task".to_string());
        assert!(!editor.replace_range("x".to_string(), 3, 4, Some("x".to_string())));
        assert!(editor.replace_range("x".to_string(), 3, 4, Some(" ".to_string())));
        assert_eq!(editor.get_text(), "- [x] Task");
        assert_eq!(editor.get_version(), 1);
    }

    #[test]
    fn test_huge_offsets_are_rejected() {
        let editor = EditorHandle::from_string("abc".to_string());
        assert!(!editor.replace_range("x".to_string(), 0, u64::MAX, None));
        assert_eq!(editor.get_text(), "abc");
    }

    #[test]
    fn test_batch_replace_is_atomic() {
        let editor = EditorHandle::from_string("- [ ] A\n- [ ] B\n".to_string());
        let entry = |from: u64, expected: &str| BatchEntryDto {
            from,
            to: from + 7,
            text: "- [x] ".to_string() + &expected[6..],
            expected_text: Some(expected.to_string()),
        };

        assert!(!editor.batch_replace(vec![entry(0, "- [ ] A"), entry(8, "- [ ] C")]));
        assert_eq!(editor.get_text(), "- [ ] A\n- [ ] B\n");

        assert!(editor.batch_replace(vec![entry(0, "- [ ] A"), entry(8, "- [ ] B")]));
        assert_eq!(editor.get_text(), "- [x] A\n- [x] B\n");
    }

    #[test]
    fn test_scroll_to_footnote_definition() {
        let editor = EditorHandle::from_string("Claim[^1].\n\n[^1]: Source.\n".to_string());
        editor.set_selection(6, 6);

        let contexts = editor.get_contexts_at_cursor();
        let [ContextDto::Footnote { target_pos, .. }] = contexts.as_slice() else {
            panic!("expected a footnote, got {contexts:?}");
        };
        editor.scroll_to_position(*target_pos);

        assert_eq!(editor.get_scroll_target(), Some(12));
        assert_eq!(editor.get_text(), "Claim[^1].\n\n[^1]: Source.\n");
    }
}
