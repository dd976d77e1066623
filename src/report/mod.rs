//! Terminal output for runs, plans and the mode catalog.

pub mod format;

pub use format::*;
