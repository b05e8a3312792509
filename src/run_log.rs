// Execution log: one line appended per successful run, never rewritten

use crate::error::{ReportError, Result};
use chrono::NaiveDate;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

pub const LOG_LINE_PREFIX: &str = "Atualização realizada em";

pub fn log_line(date: NaiveDate) -> String {
    format!("{} {}", LOG_LINE_PREFIX, crate::date_stamp(date))
}

/// Append the entry for `date` to the log at `log_path`, creating the file if needed
pub fn append_run_entry(log_path: &Path, date: NaiveDate) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|e| ReportError::io(log_path, e))?;

    writeln!(file, "{}", log_line(date)).map_err(|e| ReportError::io(log_path, e))?;

    debug!("Appended run entry to {}", log_path.display());
    Ok(())
}
