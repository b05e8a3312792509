// Sales Report - Core Library
// Reads customers, products and sales from SQLite, writes dated CSV reports and a run log

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod run_log;
pub mod table;
pub mod transform;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::Config;
pub use db::{load_tables, SourceTables};
pub use error::{ReportError, Result};
pub use export::{export_reports, ExportedFiles};
pub use pipeline::{run, RunSummary};
pub use run_log::append_run_entry;
pub use table::Table;
pub use transform::{
    average_ticket, build_report, enrich_sales, summarize_by_category, summarize_by_customer,
    EnrichedSales, GroupTotal, SalesReport,
};

use chrono::NaiveDate;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Date stamp used in report file names and the execution log (YYYY-MM-DD)
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
