// Fixtures shared by the unit tests: a small shop database in the production layout

use rusqlite::{params, Connection};
use std::path::Path;

pub fn create_shop_schema(conn: &Connection) {
    conn.execute_batch(
        "CREATE TABLE clientes (
            id_cliente INTEGER PRIMARY KEY,
            nome TEXT,
            email TEXT,
            cidade TEXT
        );
        CREATE TABLE produtos (
            id_produto INTEGER PRIMARY KEY,
            nome_produto TEXT,
            categoria TEXT,
            preco_unitario REAL
        );
        CREATE TABLE vendas (
            id_venda INTEGER PRIMARY KEY,
            id_produto INTEGER,
            id_cliente INTEGER,
            quantidade INTEGER,
            data_venda TEXT
        );",
    )
    .unwrap();
}

pub fn create_shop_database(path: &Path) -> Connection {
    let conn = Connection::open(path).unwrap();
    create_shop_schema(&conn);
    conn
}

pub fn insert_customer(conn: &Connection, id: i64, name: &str) {
    conn.execute(
        "INSERT INTO clientes (id_cliente, nome, email, cidade) VALUES (?1, ?2, ?3, ?4)",
        params![id, name, format!("cliente{}@example.com", id), "São Paulo"],
    )
    .unwrap();
}

pub fn insert_product(conn: &Connection, id: i64, price: Option<f64>, category: Option<&str>) {
    conn.execute(
        "INSERT INTO produtos (id_produto, nome_produto, categoria, preco_unitario)
         VALUES (?1, ?2, ?3, ?4)",
        params![id, format!("Produto {}", id), category, price],
    )
    .unwrap();
}

pub fn insert_sale(conn: &Connection, id: i64, product_id: i64, customer_id: i64, quantity: Option<i64>) {
    conn.execute(
        "INSERT INTO vendas (id_venda, id_produto, id_cliente, quantidade, data_venda)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, product_id, customer_id, quantity, "2024-01-15"],
    )
    .unwrap();
}

/// Products, customers and sales from the reference scenarios:
/// P1 10.00 "A", P2 2.50 "B"; Alice, Bruno; three matched sales and one
/// sale pointing at a product that does not exist.
pub fn seed_reference_data(conn: &Connection) {
    insert_product(conn, 1, Some(10.0), Some("A"));
    insert_product(conn, 2, Some(2.5), Some("B"));
    insert_customer(conn, 1, "Alice");
    insert_customer(conn, 2, "Bruno");
    insert_sale(conn, 1, 1, 1, Some(3));
    insert_sale(conn, 2, 2, 1, Some(4));
    insert_sale(conn, 3, 1, 2, Some(1));
    insert_sale(conn, 4, 99, 2, Some(2));
}
