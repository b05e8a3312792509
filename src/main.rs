use anyhow::{Context, Result};
use chrono::Local;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sales_report::{pipeline, Config};

fn main() -> Result<()> {
    setup_logging();

    let config = Config::load().context("Failed to load configuration")?;
    let today = Local::now().date_naive();

    debug!(
        "sales-report {} starting: source={}, export={}",
        sales_report::VERSION,
        config.source_path.display(),
        config.export_path.display()
    );

    let summary = pipeline::run(&config, today)
        .with_context(|| format!("Report run for {} failed", sales_report::date_stamp(today)))?;

    debug!("{}", summary.summary());
    Ok(())
}

/// Diagnostics go to stderr; stdout carries the stage confirmations
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sales_report=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
