use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Wet-season onset detection by anomalous accumulation.
#[derive(Parser)]
#[command(
    name = "onset",
    version,
    about = "Wet-season onset detection from gridded daily precipitation"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Detect onsets, aggregate statistics and write the JSON report.
    Detect(DetectArgs),
}

/// Arguments for the `detect` subcommand.
#[derive(clap::Args)]
pub struct DetectArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "onset.toml")]
    pub config: PathBuf,

    /// Override output report path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the first month of the hydrological year.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=12))]
    pub start_month: Option<u8>,
}
