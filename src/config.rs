// Job configuration: where the SQLite store lives and where reports go
//
// Defaults match the production layout; an optional sales_report.toml in the
// working directory can override either path.

use crate::error::{ReportError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File looked up in the working directory by `Config::load`
pub const CONFIG_FILE: &str = "sales_report.toml";

pub const DEFAULT_SOURCE_PATH: &str = "data/ecommerce_realista.db";
pub const DEFAULT_EXPORT_PATH: &str = "data/data_export";

/// Execution log, kept next to the reports
pub const LOG_FILE_NAME: &str = "log_execucao.txt";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Location of the SQLite store
    pub source_path: PathBuf,

    /// Destination directory for reports and the execution log
    pub export_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
        }
    }
}

impl Config {
    pub fn new(source_path: impl Into<PathBuf>, export_path: impl Into<PathBuf>) -> Self {
        Config {
            source_path: source_path.into(),
            export_path: export_path.into(),
        }
    }

    /// Read `sales_report.toml` from the working directory, or fall back to defaults
    pub fn load() -> Result<Self> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::from_file(path)
        } else {
            debug!("No {} found, using default paths", CONFIG_FILE);
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ReportError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config = Self::from_toml_str(&contents).map_err(|message| ReportError::Config {
            path: path.to_path_buf(),
            message,
        })?;

        debug!(
            "Loaded configuration from {}: source={}, export={}",
            path.display(),
            config.source_path.display(),
            config.export_path.display()
        );
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> std::result::Result<Self, String> {
        toml::from_str(contents).map_err(|e| e.to_string())
    }

    pub fn log_path(&self) -> PathBuf {
        self.export_path.join(LOG_FILE_NAME)
    }
}
