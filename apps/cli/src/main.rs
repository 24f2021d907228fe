#![allow(clippy::print_stdout)]

mod args;
mod commands;
mod logging;
mod settings;

use anyhow::{Context, Result};
use clap::Parser;

use crate::args::{Cli, Command};
use crate::settings::Settings;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    logging::init(&settings.log_level)?;

    match cli.command {
        Command::Run(args) => commands::run::run(&settings, args)?,
        Command::Order(args) => commands::order::order(&settings, args)?,
        Command::Seed(args) => commands::seed::seed(&settings, args)?,
    }

    Ok(())
}
