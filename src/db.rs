use crate::error::{ReportError, Result};
use crate::table::Table;
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use tracing::debug;

// ============================================================================
// SOURCE SCHEMA (fixed contract with the shop database)
// ============================================================================

pub const CUSTOMERS_TABLE: &str = "clientes";
pub const PRODUCTS_TABLE: &str = "produtos";
pub const SALES_TABLE: &str = "vendas";

pub const CUSTOMER_ID: &str = "id_cliente";
pub const CUSTOMER_NAME: &str = "nome";
pub const PRODUCT_ID: &str = "id_produto";
pub const UNIT_PRICE: &str = "preco_unitario";
pub const CATEGORY: &str = "categoria";
pub const QUANTITY: &str = "quantidade";

/// The three source tables, read in full
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub customers: Table,
    pub products: Table,
    pub sales: Table,
}

impl SourceTables {
    /// Check every column the transform relies on is present
    pub fn validate(&self) -> Result<()> {
        self.customers.require_column(CUSTOMER_ID)?;
        self.customers.require_column(CUSTOMER_NAME)?;

        self.products.require_column(PRODUCT_ID)?;
        self.products.require_column(UNIT_PRICE)?;
        self.products.require_column(CATEGORY)?;

        self.sales.require_column(PRODUCT_ID)?;
        self.sales.require_column(CUSTOMER_ID)?;
        self.sales.require_column(QUANTITY)?;

        Ok(())
    }
}

/// Open the store read-only; a missing file is an error, never a new database
pub fn open_source(path: &Path) -> Result<Connection> {
    let connection_error = |source: rusqlite::Error| ReportError::Connection {
        path: path.to_path_buf(),
        source,
    };

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(connection_error)?;

    // SQLite opens lazily; touch the schema so a non-database file fails here
    conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
        row.get::<_, i64>(0)
    })
    .map_err(connection_error)?;

    Ok(conn)
}

/// Read every row of `table`, keeping column order and SQLite storage classes
pub fn read_table(conn: &Connection, table: &str) -> Result<Table> {
    let query_error = |e: rusqlite::Error| ReportError::query(table, e.to_string());

    let mut stmt = conn
        .prepare(&format!("SELECT * FROM \"{}\"", table))
        .map_err(query_error)?;

    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let width = columns.len();
    let mut result = Table::new(table, columns);

    let mut rows = stmt.query([]).map_err(query_error)?;
    while let Some(row) = rows.next().map_err(query_error)? {
        let values = (0..width)
            .map(|i| row.get::<_, Value>(i))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(query_error)?;
        result.rows.push(values);
    }

    debug!("Read {} rows from {}", result.len(), table);
    Ok(result)
}

/// Read the three source tables through an already open connection
pub fn load_from_connection(conn: &Connection) -> Result<SourceTables> {
    let tables = SourceTables {
        customers: read_table(conn, CUSTOMERS_TABLE)?,
        products: read_table(conn, PRODUCTS_TABLE)?,
        sales: read_table(conn, SALES_TABLE)?,
    };

    tables.validate()?;
    Ok(tables)
}

/// Open the store at `path`, read customers, products and sales, close it
pub fn load_tables(path: &Path) -> Result<SourceTables> {
    let conn = open_source(path)?;
    let tables = load_from_connection(&conn)?;
    drop(conn);

    debug!(
        "Loaded {} customers, {} products, {} sales from {}",
        tables.customers.len(),
        tables.products.len(),
        tables.sales.len(),
        path.display()
    );
    Ok(tables)
}
