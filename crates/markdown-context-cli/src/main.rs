mod args;
mod commands;
mod filter;

use std::{env, process};

use anyhow::Result;
use clap::Parser;
use markdown_context_config::Config;

use crate::args::{Cli, Command};
use crate::filter::ContextFilter;

fn init_logging(config: &Config) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Warn);
    if let Some(level) = &config.log_level {
        builder.parse_filters(level);
    }
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Contexts { file, selection } => {
            let filter = ContextFilter::new(config.contexts.clone());
            println!("{}", commands::contexts(&file, selection, &filter)?);
        }
        Command::Toggle { file, selection } => commands::toggle(&file, selection)?,
        Command::Replace {
            file,
            from,
            to,
            text,
            expected,
        } => commands::replace(&file, from, to, &text, expected.as_deref())?,
        Command::InitConfig { force } => {
            let path = Config::config_path();
            commands::init_config(&path, force)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // A broken config file is reported, not silently replaced by defaults.
    // `init-config` still runs so it can overwrite one.
    let loaded = match cli.command {
        Command::InitConfig { .. } => Ok(Config::default()),
        _ => Config::load_or_default(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    init_logging(&config);
    log::debug!("config path: {}", Config::config_path().display());

    if let Err(e) = run(cli.command, &config) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
