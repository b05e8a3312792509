// CSV export of the enriched sales and the two summaries
// One file per table, named <table>_<YYYY-MM-DD>.csv, rewritten on every run of the day.

use crate::error::{ReportError, Result};
use crate::table::Table;
use crate::transform::SalesReport;
use chrono::NaiveDate;
use rusqlite::types::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENRICHED_SALES_FILE: &str = "vendas_detalhadas";
pub const CATEGORY_SUMMARY_FILE: &str = "resumo_categorias";
pub const CUSTOMER_SUMMARY_FILE: &str = "resumo_clientes";

/// Paths written by one export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFiles {
    pub enriched_sales: PathBuf,
    pub category_summary: PathBuf,
    pub customer_summary: PathBuf,
}

impl ExportedFiles {
    pub fn all(&self) -> [&Path; 3] {
        [
            self.enriched_sales.as_path(),
            self.category_summary.as_path(),
            self.customer_summary.as_path(),
        ]
    }
}

pub fn report_file_name(stem: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", stem, crate::date_stamp(date))
}

/// Render one cell the way it appears in the CSV.
///
/// NULL is an empty field; reals always carry a decimal point (`30.0`);
/// blobs are written as lowercase hex.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => format!("{:?}", f),
        Value::Text(s) => s.clone(),
        Value::Blob(bytes) => bytes.iter().map(|b| format!("{:02x}", b)).collect(),
    }
}

/// Write `table` to `path` as UTF-8 CSV with a header row, truncating any existing file
pub fn write_table_csv(table: &Table, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| ReportError::csv(path, e))?;

    wtr.write_record(&table.columns)
        .map_err(|e| ReportError::csv(path, e))?;

    for row in table.rows() {
        wtr.write_record(row.iter().map(format_cell))
            .map_err(|e| ReportError::csv(path, e))?;
    }

    wtr.flush().map_err(|e| ReportError::io(path, e))?;

    debug!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Write the three report files into `export_dir`, creating it if needed
pub fn export_reports(
    report: &SalesReport,
    export_dir: &Path,
    date: NaiveDate,
) -> Result<ExportedFiles> {
    std::fs::create_dir_all(export_dir).map_err(|e| ReportError::io(export_dir, e))?;

    let files = ExportedFiles {
        enriched_sales: export_dir.join(report_file_name(ENRICHED_SALES_FILE, date)),
        category_summary: export_dir.join(report_file_name(CATEGORY_SUMMARY_FILE, date)),
        customer_summary: export_dir.join(report_file_name(CUSTOMER_SUMMARY_FILE, date)),
    };

    write_table_csv(&report.enriched.table, &files.enriched_sales)?;
    write_table_csv(&report.category_table(), &files.category_summary)?;
    write_table_csv(&report.customer_table(), &files.customer_summary)?;

    Ok(files)
}
