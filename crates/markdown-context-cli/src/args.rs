//! Command-line argument structures

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use markdown_context_engine::Selection;

#[derive(Debug, Parser)]
#[command(name = "markdown-context-cli")]
#[command(version)]
#[command(about = "Inspect Markdown contexts at a position and apply guarded edits", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the contexts at a cursor or selection as JSON
    Contexts {
        /// Markdown file to inspect
        file: PathBuf,

        /// Byte offset (`12`) or selection (`4..20`, anchor then head)
        #[arg(value_parser = parse_selection)]
        selection: Selection,
    },

    /// Toggle the checkbox at a cursor, or every task in a selection
    Toggle {
        file: PathBuf,

        #[arg(value_parser = parse_selection)]
        selection: Selection,
    },

    /// Replace a byte range, optionally only if it still holds the expected text
    Replace {
        file: PathBuf,
        from: usize,
        to: usize,
        text: String,
        expected: Option<String>,
    },

    /// Write the default config file
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn parse_offset(value: &str) -> Result<usize, String> {
    value
        .parse()
        .map_err(|_| format!("'{value}' is not a byte offset"))
}

/// `12` is a cursor, `4..20` a selection anchored at 4 with its head at 20.
pub fn parse_selection(value: &str) -> Result<Selection, String> {
    match value.split_once("..") {
        Some((anchor, head)) => Ok(Selection::new(parse_offset(anchor)?, parse_offset(head)?)),
        None => Ok(Selection::cursor(parse_offset(value)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse(values: &[&str]) -> Result<Command, clap::Error> {
        let argv = std::iter::once("markdown-context-cli").chain(values.iter().copied());
        Cli::try_parse_from(argv).map(|cli| cli.command)
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case("7", Selection::cursor(7))]
    #[case("3..9", Selection::new(3, 9))]
    #[case("9..3", Selection::new(9, 3))]
    fn selections(#[case] value: &str, #[case] expected: Selection) {
        assert_eq!(parse_selection(value).unwrap(), expected);
    }

    #[rstest]
    #[case("-1")]
    #[case("a..4")]
    #[case("")]
    fn bad_selections(#[case] value: &str) {
        assert!(parse_selection(value).is_err());
    }

    #[test]
    fn contexts_with_a_selection() {
        assert_eq!(
            parse(&["contexts", "a.md", "4..20"]).unwrap(),
            Command::Contexts {
                file: PathBuf::from("a.md"),
                selection: Selection::new(4, 20),
            }
        );
    }

    #[test]
    fn replace_with_and_without_expected_text() {
        assert_eq!(
            parse(&["replace", "a.md", "0", "3", "new"]).unwrap(),
            Command::Replace {
                file: PathBuf::from("a.md"),
                from: 0,
                to: 3,
                text: "new".to_string(),
                expected: None,
            }
        );

        let Command::Replace { expected, .. } =
            parse(&["replace", "a.md", "0", "3", "new", "old"]).unwrap()
        else {
            panic!("expected a replace command");
        };
        assert_eq!(expected.as_deref(), Some("old"));
    }

    #[test]
    fn init_config_flag() {
        assert_eq!(
            parse(&["init-config", "--force"]).unwrap(),
            Command::InitConfig { force: true }
        );
    }

    #[rstest]
    #[case(&[])]
    #[case(&["contexts", "a.md"])]
    #[case(&["contexts", "a.md", "x..2"])]
    #[case(&["replace", "a.md", "0", "3", "new", "old", "extra"])]
    #[case(&["frobnicate", "a.md", "1"])]
    fn rejected(#[case] values: &[&str]) {
        assert!(parse(values).is_err());
    }
}
