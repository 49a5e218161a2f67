//! Tabular export of completed sampling runs.
//!
//! A report holds one row per valid sample and a trailing summary row with
//! only the average filled in. It is regenerated on every run and written as
//! a spreadsheet (`.xlsx`) or as CSV.

pub mod export;
pub mod table;

// Re-export commonly used items
pub use export::{ReportFormat, REPORT_FILE_STEM};
pub use table::{Report, ReportRow, HEADERS};
