use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Hydroval streamflow forecast validation harness.
#[derive(Parser)]
#[command(
    name = "hydroval",
    version,
    about = "Validate streamflow forecasts against USGS gauges and the National Water Model"
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
    /// Fetch USGS daily values into the local observation cache.
    Fetch(FetchArgs),
    /// Run the validation comparisons and write summary artifacts.
    Validate(ValidateArgs),
    /// Render a Markdown report from a validation summary.
    Report(ReportArgs),
}

/// Arguments for the `fetch` subcommand.
#[derive(clap::Args)]
pub struct FetchArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "hydroval.toml")]
    pub config: PathBuf,

    /// First date of the validation window (YYYY-MM-DD).
    #[arg(long)]
    pub start: NaiveDate,

    /// Last date of the validation window; defaults to the start date.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Override the observation cache path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `validate` subcommand.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "hydroval.toml")]
    pub config: PathBuf,

    /// First date of the validation window (YYYY-MM-DD).
    #[arg(long)]
    pub start: NaiveDate,

    /// Last date of the validation window; defaults to the start date.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Fetch observations live instead of reading the cache.
    #[arg(long)]
    pub live: bool,

    /// Override output directory from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `report` subcommand.
#[derive(clap::Args)]
pub struct ReportArgs {
    /// Summary JSON files produced by `validate`, one per comparison.
    #[arg(required = true)]
    pub summaries: Vec<PathBuf>,

    /// Path for the rendered Markdown report.
    #[arg(short, long, default_value = "report.md")]
    pub output: PathBuf,
}
