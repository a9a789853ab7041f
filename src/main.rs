mod cli;
mod config;
mod convert;
mod detect_cmd;
mod logging;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use crate::cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    debug!(version = env!("CARGO_PKG_VERSION"), "starting onset");

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Detect(args) => detect_cmd::run(args),
    }
}
