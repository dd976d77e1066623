//! Command-line parsing.
//!
//! Parsing stays here; turning arguments into a `ReportConfig` (date parsing,
//! settings path resolution) happens in `app`.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::domain::DEFAULT_MODES;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "xlsxreport", version, about = "Excel reports with charts from SQLite time series")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Query the store and write the workbook (default).
    Generate(ReportArgs),
    /// Print the resolved ranges and queries without touching the store.
    Plan(ReportArgs),
    /// List the report modes.
    Modes,
}

/// Options shared by `generate` and `plan`.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// Report mode codes, any combination of H, Y, V, P, S, W (e.g. "HW").
    #[arg(short = 'm', long, default_value = DEFAULT_MODES)]
    pub mode: String,

    /// Start of the period for V/P (e.g. 2021-12-31 or "2021-12-31 12:25:20").
    #[arg(short = 's', long = "start-dt", alias = "start_dt")]
    pub start_dt: Option<String>,

    /// End of the period for V/P; defaults to now. Ignored without --start-dt.
    #[arg(short = 'e', long = "end-dt", alias = "end_dt")]
    pub end_dt: Option<String>,

    /// Data name to report on (key in the settings file, e.g. rate).
    #[arg(short = 'd', long)]
    pub data: String,

    /// Settings JSON file. Defaults to $XLSXREPORT_SETTINGS, then ./settings.json.
    #[arg(long, value_name = "JSON")]
    pub settings: Option<PathBuf>,

    /// Directory for the generated workbook.
    #[arg(short = 'o', long, default_value = ".")]
    pub output_dir: PathBuf,
}
