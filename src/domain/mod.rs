//! Domain layer: report modes, date ranges, and the resolved report descriptors.
//!
//! - `catalog`: the fixed set of report modes (`H`, `Y`, `V`, `P`, `S`, `W`)
//! - `range`: turning a mode + "now" + optional user bounds into a `DateRange`
//! - `types`: shared value types (`DateRange`, `DataSourceConfig`, `ReportSpec`, ...)

pub mod catalog;
pub mod range;
pub mod types;

pub use catalog::*;
pub use range::*;
pub use types::*;
