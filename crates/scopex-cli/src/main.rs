//! Scopex CLI - Command-line utility for scope-filtered extraction of
//! data-export archives.

mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    logging::init_tracing(cli.verbose, cli.quiet, cli.json);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    commands::extract::execute(&cli, &*formatter)
}
