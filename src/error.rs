// Error taxonomy for the report job
// Every stage fails with exactly one of these; nothing is recovered locally.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    /// The SQLite store could not be opened
    #[error("cannot open data source {path}: {source}")]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A source table is absent or does not have the expected shape
    #[error("query on table '{table}' failed: {message}")]
    Query { table: String, message: String },

    /// A value has the wrong type for the computation it feeds
    #[error("type mismatch in column '{column}': {message}")]
    Type { column: String, message: String },

    /// Writing a report or the execution log failed
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl ReportError {
    pub fn query(table: &str, message: impl Into<String>) -> Self {
        ReportError::Query {
            table: table.to_string(),
            message: message.into(),
        }
    }

    pub fn type_mismatch(column: &str, message: impl Into<String>) -> Self {
        ReportError::Type {
            column: column.to_string(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }

    /// csv errors wrap an io error most of the time; keep it when present
    pub fn csv(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        let source = match err.into_kind() {
            csv::ErrorKind::Io(io_err) => io_err,
            other => std::io::Error::new(std::io::ErrorKind::Other, format!("{:?}", other)),
        };
        ReportError::io(path, source)
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_message_names_table() {
        let err = ReportError::query("vendas", "no such table: vendas");
        let message = err.to_string();

        assert!(message.contains("vendas"));
        assert!(message.contains("no such table"));
    }

    #[test]
    fn test_csv_error_keeps_io_kind() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ReportError::csv("out.csv", csv::Error::from(io_err));

        match err {
            ReportError::Io { path, source } => {
                assert_eq!(path, PathBuf::from("out.csv"));
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}
