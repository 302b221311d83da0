use std::path::Path;

use anyhow::{Context as _, Result, bail};
use markdown_context_config::Config;
use markdown_context_engine::{Context, Editor, Selection, edits};

use crate::filter::ContextFilter;

fn open(file: &Path) -> Result<Editor> {
    let bytes =
        std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    Editor::from_bytes(&bytes).with_context(|| format!("{} is not UTF-8", file.display()))
}

fn save(file: &Path, editor: &Editor) -> Result<()> {
    std::fs::write(file, editor.text())
        .with_context(|| format!("failed to write {}", file.display()))
}

/// Contexts at `selection` as pretty JSON.
pub fn contexts(file: &Path, selection: Selection, filter: &ContextFilter) -> Result<String> {
    let mut editor = open(file)?;
    editor.set_selection(selection.anchor, selection.head);

    let found = filter.apply(editor.get_contexts_at_cursor());
    log::debug!("{} contexts in {}", found.len(), file.display());
    Ok(serde_json::to_string_pretty(&found)?)
}

/// Toggle every task in a selection, or the checkbox at a cursor.
pub fn toggle(file: &Path, selection: Selection) -> Result<()> {
    let mut editor = open(file)?;
    editor.set_selection(selection.anchor, selection.head);
    let found = editor.get_contexts_at_cursor();

    let tasks = found.iter().find_map(|context| match context {
        Context::TaskSelection(tasks) => Some(edits::toggle_tasks(tasks)),
        _ => None,
    });
    let entries = match tasks {
        Some(entries) => entries,
        None => {
            let Some(checkbox) = found.iter().find_map(|context| match context {
                Context::Checkbox(checkbox) => Some(checkbox),
                _ => None,
            }) else {
                bail!("no checkbox at {}", selection.head);
            };
            vec![edits::toggle_checkbox(checkbox)?]
        }
    };

    if !editor.batch_replace(&entries) {
        bail!("toggle rejected, see log for details");
    }
    save(file, &editor)
}

pub fn replace(
    file: &Path,
    from: usize,
    to: usize,
    text: &str,
    expected: Option<&str>,
) -> Result<()> {
    let mut editor = open(file)?;
    if !editor.replace_range(text, from, to, expected) {
        bail!("replacement of {from}..{to} rejected");
    }
    save(file, &editor)
}

/// Write the default config to `path`, refusing to clobber one unless forced.
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists, pass --force to overwrite", path.display());
    }
    Config::default().save_to_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_context_config::ContextToggles;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn note(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("note.md");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn contexts_as_json() {
        let dir = TempDir::new().unwrap();
        let path = note(&dir, "- [ ] `code`\n");

        let json = contexts(&path, Selection::cursor(8), &ContextFilter::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["type"], "code");
        assert_eq!(value[0]["code"], "code");
        assert_eq!(value[1]["type"], "checkbox");
    }

    #[test]
    fn contexts_respect_the_filter() {
        let dir = TempDir::new().unwrap();
        let path = note(&dir, "- [ ] `code`\n");
        let filter = ContextFilter::new(ContextToggles {
            checkboxes: false,
            ..ContextToggles::default()
        });

        let json = contexts(&path, Selection::cursor(8), &filter).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn toggle_checkbox_at_cursor() {
        let dir = TempDir::new().unwrap();
        let path = note(&dir, "# Tasks\n- [ ] one\n");

        toggle(&path, Selection::cursor(12)).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "# Tasks\n- [x] one\n"
        );
    }

    #[test]
    fn toggle_selection_checks_everything() {
        let dir = TempDir::new().unwrap();
        let path = note(&dir, "- [x] one\n- [ ] two\n");

        toggle(&path, Selection::new(0, 19)).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "- [x] one\n- [x] two\n"
        );
    }

    #[test]
    fn toggle_without_checkbox_fails_and_keeps_file() {
        let dir = TempDir::new().unwrap();
        let path = note(&dir, "plain text\n");

        assert!(toggle(&path, Selection::cursor(2)).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "plain text\n");
    }

    #[test]
    fn replace_is_guarded() {
        let dir = TempDir::new().unwrap();
        let path = note(&dir, "hello world\n");

        assert!(replace(&path, 0, 5, "howdy", Some("HELLO")).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello world\n");

        replace(&path, 0, 5, "howdy", Some("hello")).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "howdy world\n");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(replace(&dir.path().join("nope.md"), 0, 0, "x", None).is_err());
    }

    #[test]
    fn init_config_writes_defaults_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf/config.toml");

        init_config(&path, false).unwrap();
        assert_eq!(Config::load_from_path(&path).unwrap(), Some(Config::default()));

        std::fs::write(&path, "log_level = \"debug\"\n").unwrap();
        assert!(init_config(&path, false).is_err());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "log_level = \"debug\"\n"
        );

        init_config(&path, true).unwrap();
        assert_eq!(Config::load_from_path(&path).unwrap(), Some(Config::default()));
    }
}
