//! `sqlite-xlsx-report` library crate.
//!
//! The binary (`xlsxreport`) is a thin wrapper around this library so that:
//!
//! - mode/range/query logic is testable without spawning processes
//! - the pure core (`domain`, `query`) never touches the clock, filesystem or store

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod query;
pub mod report;
