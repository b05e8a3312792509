// Load → Transform → Export → Log, in that order, stopping at the first failure

use crate::config::Config;
use crate::db::load_tables;
use crate::error::Result;
use crate::export::{export_reports, ExportedFiles};
use crate::run_log::append_run_entry;
use crate::transform::build_report;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// What one run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub date: NaiveDate,
    pub sale_count: usize,
    pub enriched_count: usize,
    pub average_ticket: Option<f64>,
    pub files: ExportedFiles,
    pub log_path: PathBuf,
}

impl RunSummary {
    pub fn summary(&self) -> String {
        format!(
            "{}: {} sales, {} enriched rows, average ticket {}",
            crate::date_stamp(self.date),
            self.sale_count,
            self.enriched_count,
            format_ticket(self.average_ticket)
        )
    }
}

pub fn format_ticket(average: Option<f64>) -> String {
    match average {
        Some(value) => format!("R$ {:.2}", value),
        None => "n/a (no priced sales)".to_string(),
    }
}

/// Run the whole job for `date`
pub fn run(config: &Config, date: NaiveDate) -> Result<RunSummary> {
    let started = Instant::now();

    // 1. Load
    info!("Loading tables from {}", config.source_path.display());
    let tables = load_tables(&config.source_path)?;
    println!("✅ Tabelas carregadas com sucesso.");

    // 2. Transform
    info!("Joining and aggregating {} sales", tables.sales.len());
    let report = build_report(&tables)?;
    println!("💰 Ticket médio: {}\n", format_ticket(report.average_ticket));

    // 3. Export
    info!("Exporting reports to {}", config.export_path.display());
    let files = export_reports(&report, &config.export_path, date)?;
    println!("📦 Arquivos exportados com sucesso!");

    // 4. Log
    let log_path = config.log_path();
    append_run_entry(&log_path, date)?;
    println!("🕒 Log de execução atualizado.");

    debug!("Run finished in {:?}", started.elapsed());
    println!("🚀 Processo de automação concluído com sucesso!");

    Ok(RunSummary {
        date,
        sale_count: tables.sales.len(),
        enriched_count: report.enriched.len(),
        average_ticket: report.average_ticket,
        files,
        log_path,
    })
}
