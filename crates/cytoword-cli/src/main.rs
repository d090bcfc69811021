mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::init_logging(cli.quiet, cli.verbose);
    commands::run(cli.command)
}
