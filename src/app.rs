//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - resolves the run configuration
//! - runs the report pipeline and prints the outcome

use std::time::Instant;

use chrono::{Local, NaiveDateTime};
use clap::Parser;
use clap::error::ErrorKind;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, ReportArgs};
use crate::domain::{ReportConfig, parse_instant};
use crate::error::AppError;
use crate::io::settings::{load_data_source, resolve_settings_path};

pub mod pipeline;

/// Entry point for the `xlsxreport` binary.
pub fn run() -> Result<(), AppError> {
    let argv = rewrite_args(std::env::args().collect());
    let cli = parse_cli(argv)?;
    init_tracing(cli.verbose);

    match cli.command {
        Command::Generate(args) => handle_generate(args),
        Command::Plan(args) => handle_plan(args),
        Command::Modes => {
            println!("{}", crate::report::format_mode_catalog());
            Ok(())
        }
    }
}

/// Usage errors exit with the config code; help and version still print and exit 0.
fn parse_cli(argv: Vec<String>) -> Result<Cli, AppError> {
    match Cli::try_parse_from(argv) {
        Ok(cli) => Ok(cli),
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => err.exit(),
        Err(err) => Err(AppError::config(err.to_string().trim_end())),
    }
}

fn handle_generate(args: ReportArgs) -> Result<(), AppError> {
    let began = Instant::now();
    let now = local_now();
    let config = report_config_from_args(&args)?;

    let run = pipeline::run_report(&config, now)?;

    println!("{}", crate::report::format_run_summary(&run, began.elapsed()));
    Ok(())
}

fn handle_plan(args: ReportArgs) -> Result<(), AppError> {
    let now = local_now();
    let config = report_config_from_args(&args)?;
    let source = load_data_source(&config.settings_path, &config.data_name)?;
    let plan = pipeline::plan_reports(&config, &source, now)?;

    println!("{}", crate::report::format_plan(&plan));
    Ok(())
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parse dates and pick the settings file.
pub fn report_config_from_args(args: &ReportArgs) -> Result<ReportConfig, AppError> {
    let user_start = args.start_dt.as_deref().map(parse_instant).transpose()?;
    let user_end = args.end_dt.as_deref().map(parse_instant).transpose()?;

    Ok(ReportConfig {
        modes: args.mode.clone(),
        user_start,
        user_end,
        data_name: args.data.clone(),
        settings_path: resolve_settings_path(args.settings.as_deref()),
        output_dir: args.output_dir.clone(),
    })
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second init (e.g. from tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Insert the implicit `generate` subcommand.
///
/// A command line with no arguments, or whose first argument is a flag other
/// than top-level help/version, is a report run: `xlsxreport -m HW -d rate`
/// parses as `xlsxreport generate -m HW -d rate`. Anything else is passed to
/// clap as given.
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let implicit_generate = match argv.get(1).map(String::as_str) {
        None => true,
        Some("-h" | "--help" | "-V" | "--version") => false,
        Some(first) => first.starts_with('-'),
    };
    if implicit_generate {
        argv.insert(1.min(argv.len()), "generate".to_string());
    }
    argv
}
