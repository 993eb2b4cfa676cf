mod app;
mod commands;
mod output;

use anyhow::Context;
use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .context("failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    // Show relocscope info+ on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("relocscope", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::Headers { path } => commands::headers::run(path, &cli.global),
        Command::Sections { path } => commands::sections::run(path, &cli.global),
        Command::Directories { path } => commands::directories::run(path, &cli.global),
        Command::Relocs { path, options } => commands::relocs::run(path, options, &cli.global),
        Command::Dump { path, options } => {
            commands::dump::run(path.as_deref(), options, &cli.global)
        }
    }
}
