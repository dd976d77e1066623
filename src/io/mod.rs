//! Input/output helpers.
//!
//! - settings document loading (`settings`)
//! - SQLite store access (`store`)
//! - XLSX rendering (`workbook`)

pub mod settings;
pub mod store;
pub mod workbook;

pub use settings::*;
pub use store::*;
pub use workbook::*;
