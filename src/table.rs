// In-memory tabular data: column names plus rows of SQLite dynamic values

use crate::error::{ReportError, Result};
use rusqlite::types::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(name: &str, columns: Vec<String>) -> Self {
        Table {
            name: name.to_string(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from literal rows (handy for tests and small fixtures)
    pub fn with_rows(name: &str, columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Table {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Like `column_index`, but a missing column means the table is malformed
    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column).ok_or_else(|| {
            ReportError::query(
                &self.name,
                format!("missing required column '{}'", column),
            )
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Values of one column, top to bottom
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().map(move |r| &r[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_table() -> Table {
        Table::with_rows(
            "produtos",
            &["id_produto", "preco_unitario", "categoria"],
            vec![
                vec![Value::Integer(1), Value::Real(10.0), Value::Text("A".to_string())],
                vec![Value::Integer(2), Value::Real(5.5), Value::Null],
            ],
        )
    }

    #[test]
    fn test_column_lookup() {
        let table = create_test_table();

        assert_eq!(table.column_index("categoria"), Some(2));
        assert_eq!(table.column_index("nome"), None);
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_require_column_missing_is_query_error() {
        let table = create_test_table();

        let err = table.require_column("quantidade").unwrap_err();
        match err {
            ReportError::Query { table, message } => {
                assert_eq!(table, "produtos");
                assert!(message.contains("quantidade"));
            }
            other => panic!("expected Query error, got {:?}", other),
        }
    }

    #[test]
    fn test_column_values() {
        let table = create_test_table();

        let prices: Vec<&Value> = table.column_values(1).collect();
        assert_eq!(prices, vec![&Value::Real(10.0), &Value::Real(5.5)]);
    }
}
