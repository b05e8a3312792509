// Join & aggregate: sales ⟕ products ⟕ customers, line totals, group sums
//
// Left joins keep every sale. Unmatched sides contribute NULLs, a NULL
// price or quantity yields a NULL line total, and NULL group keys get a
// bucket of their own. Everything here is a pure function of its inputs.

use crate::db::{
    SourceTables, CATEGORY, CUSTOMER_ID, CUSTOMER_NAME, PRODUCT_ID, QUANTITY, UNIT_PRICE,
};
use crate::error::{ReportError, Result};
use crate::table::Table;
use rusqlite::types::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};

/// Name of the computed `quantity × unit_price` column
pub const LINE_TOTAL: &str = "valor_total_calc";

pub const ENRICHED_TABLE: &str = "vendas_detalhadas";

// ============================================================================
// KEY VALUES (join and group-by keys)
// ============================================================================

/// A non-NULL SQLite value usable as a join or grouping key.
/// Integral reals collapse to integers so `1` and `1.0` meet.
#[derive(Debug, Clone)]
enum KeyValue {
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl KeyValue {
    fn from_value(value: &Value) -> Option<KeyValue> {
        match value {
            Value::Null => None,
            Value::Integer(i) => Some(KeyValue::Integer(*i)),
            Value::Real(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Some(KeyValue::Integer(*f as i64))
                } else {
                    Some(KeyValue::Real(*f))
                }
            }
            Value::Text(s) => Some(KeyValue::Text(s.clone())),
            Value::Blob(b) => Some(KeyValue::Blob(b.clone())),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            KeyValue::Integer(_) | KeyValue::Real(_) => 0,
            KeyValue::Text(_) => 1,
            KeyValue::Blob(_) => 2,
        }
    }
}

impl Ord for KeyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (KeyValue::Integer(a), KeyValue::Integer(b)) => a.cmp(b),
            (KeyValue::Real(a), KeyValue::Real(b)) => a.total_cmp(b),
            (KeyValue::Integer(a), KeyValue::Real(b)) => {
                (*a as f64).total_cmp(b).then(Ordering::Less)
            }
            (KeyValue::Real(a), KeyValue::Integer(b)) => {
                a.total_cmp(&(*b as f64)).then(Ordering::Greater)
            }
            (KeyValue::Text(a), KeyValue::Text(b)) => a.cmp(b),
            (KeyValue::Blob(a), KeyValue::Blob(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for KeyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for KeyValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for KeyValue {}

impl Hash for KeyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            KeyValue::Integer(i) => {
                0u8.hash(state);
                i.hash(state);
            }
            KeyValue::Real(f) => {
                1u8.hash(state);
                f.to_bits().hash(state);
            }
            KeyValue::Text(s) => {
                2u8.hash(state);
                s.hash(state);
            }
            KeyValue::Blob(b) => {
                3u8.hash(state);
                b.hash(state);
            }
        }
    }
}

// ============================================================================
// LEFT JOIN
// ============================================================================

/// Left join `left` to `right` on `left[left_key] == right[right_key]`.
///
/// Output columns: every left column, then every right column except the
/// key. Non-key names present on both sides get `_x` / `_y` suffixes.
/// NULL keys never match.
pub fn left_join(
    name: &str,
    left: &Table,
    left_key: usize,
    right: &Table,
    right_key: usize,
) -> Table {
    let key_name = &left.columns[left_key];
    let right_names: Vec<&String> = right
        .columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != right_key)
        .map(|(_, c)| c)
        .collect();

    let mut columns: Vec<String> = left
        .columns
        .iter()
        .map(|c| {
            if c != key_name && right_names.contains(&c) {
                format!("{}_x", c)
            } else {
                c.clone()
            }
        })
        .collect();
    for c in &right_names {
        if *c != key_name && left.columns.contains(*c) {
            columns.push(format!("{}_y", c));
        } else {
            columns.push((*c).clone());
        }
    }

    let mut index: HashMap<KeyValue, Vec<usize>> = HashMap::new();
    for (i, row) in right.rows.iter().enumerate() {
        if let Some(key) = KeyValue::from_value(&row[right_key]) {
            index.entry(key).or_default().push(i);
        }
    }

    let mut joined = Table::new(name, columns);
    let empty_right = vec![Value::Null; right_names.len()];

    for row in &left.rows {
        let matches = KeyValue::from_value(&row[left_key]).and_then(|k| index.get(&k));

        match matches {
            Some(right_rows) => {
                for &r in right_rows {
                    let mut out = row.clone();
                    out.extend(
                        right.rows[r]
                            .iter()
                            .enumerate()
                            .filter(|(i, _)| *i != right_key)
                            .map(|(_, v)| v.clone()),
                    );
                    joined.rows.push(out);
                }
            }
            None => {
                let mut out = row.clone();
                out.extend(empty_right.iter().cloned());
                joined.rows.push(out);
            }
        }
    }

    joined
}

/// Where right column `right_column` lands in the output of `left_join`
fn joined_position(left_width: usize, right_key: usize, right_column: usize) -> usize {
    if right_column > right_key {
        left_width + right_column - 1
    } else {
        left_width + right_column
    }
}

// ============================================================================
// ENRICHED SALES
// ============================================================================

/// Sales joined with their product and customer, plus the line total.
/// Positions of the columns later stages read are kept here, so collision
/// suffixes on names don't matter downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedSales {
    pub table: Table,
    pub category_column: usize,
    pub customer_name_column: usize,
    pub line_total_column: usize,
}

impl EnrichedSales {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Line totals in row order; `None` where price or quantity was missing
    pub fn line_totals(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.table.column_values(self.line_total_column).map(|v| match v {
            Value::Real(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        })
    }
}

fn transform_column(table: &Table, column: &str) -> Result<usize> {
    table.column_index(column).ok_or_else(|| {
        ReportError::type_mismatch(column, format!("column missing from table '{}'", table.name))
    })
}

/// Numeric view of a cell: NULL stays `None`, text and blobs are a type error
fn numeric(value: &Value, column: &str, row: usize) -> Result<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::Integer(i) => Ok(Some(*i as f64)),
        Value::Real(f) => Ok(Some(*f)),
        Value::Text(s) => Err(ReportError::type_mismatch(
            column,
            format!("expected a number in sale row {}, found text '{}'", row + 1, s),
        )),
        Value::Blob(_) => Err(ReportError::type_mismatch(
            column,
            format!("expected a number in sale row {}, found a blob", row + 1),
        )),
    }
}

pub fn enrich_sales(tables: &SourceTables) -> Result<EnrichedSales> {
    let sales = &tables.sales;
    let products = &tables.products;
    let customers = &tables.customers;

    let sale_product = transform_column(sales, PRODUCT_ID)?;
    let sale_customer = transform_column(sales, CUSTOMER_ID)?;
    let quantity = transform_column(sales, QUANTITY)?;

    let product_key = transform_column(products, PRODUCT_ID)?;
    let price = transform_column(products, UNIT_PRICE)?;
    let category = transform_column(products, CATEGORY)?;

    let customer_key = transform_column(customers, CUSTOMER_ID)?;
    let customer_name = transform_column(customers, CUSTOMER_NAME)?;

    let with_products = left_join(ENRICHED_TABLE, sales, sale_product, products, product_key);
    let price = joined_position(sales.columns.len(), product_key, price);
    let category = joined_position(sales.columns.len(), product_key, category);

    // Left columns keep their positions through a join
    let mut table = left_join(
        ENRICHED_TABLE,
        &with_products,
        sale_customer,
        customers,
        customer_key,
    );
    let customer_name = joined_position(with_products.columns.len(), customer_key, customer_name);

    let quantity_name = table.columns[quantity].clone();
    let price_name = table.columns[price].clone();

    for (i, row) in table.rows.iter_mut().enumerate() {
        let qty = numeric(&row[quantity], &quantity_name, i)?;
        let unit_price = numeric(&row[price], &price_name, i)?;

        let total = match (qty, unit_price) {
            (Some(q), Some(p)) => Value::Real(q * p),
            _ => Value::Null,
        };
        row.push(total);
    }

    table.columns.push(LINE_TOTAL.to_string());
    let line_total_column = table.columns.len() - 1;

    Ok(EnrichedSales {
        table,
        category_column: category,
        customer_name_column: customer_name,
        line_total_column,
    })
}

// ============================================================================
// AGGREGATES
// ============================================================================

/// Mean of the non-NULL line totals; `None` when there are none
pub fn average_ticket(enriched: &EnrichedSales) -> Option<f64> {
    let (sum, count) = enriched
        .line_totals()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), t| (sum + t, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Sum of all non-NULL line totals
pub fn grand_total(enriched: &EnrichedSales) -> f64 {
    enriched.line_totals().flatten().sum()
}

/// One group of a summary: the key as it appeared in the data, and its sum
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    pub key: Value,
    pub total: f64,
}

/// Sum line totals per distinct value of `key_column`.
///
/// NULL totals add nothing (an all-NULL group sums to 0.0). NULL keys form
/// their own group, emitted after the others, which come in ascending order.
pub fn sum_by(enriched: &EnrichedSales, key_column: usize) -> Vec<GroupTotal> {
    let mut groups: BTreeMap<KeyValue, GroupTotal> = BTreeMap::new();
    let mut null_group: Option<f64> = None;

    let keys = enriched.table.column_values(key_column);
    for (key, total) in keys.zip(enriched.line_totals()) {
        let amount = total.unwrap_or(0.0);
        match KeyValue::from_value(key) {
            Some(k) => {
                groups
                    .entry(k)
                    .or_insert_with(|| GroupTotal {
                        key: key.clone(),
                        total: 0.0,
                    })
                    .total += amount;
            }
            None => *null_group.get_or_insert(0.0) += amount,
        }
    }

    let mut result: Vec<GroupTotal> = groups.into_values().collect();
    if let Some(total) = null_group {
        result.push(GroupTotal {
            key: Value::Null,
            total,
        });
    }
    result
}

pub fn summarize_by_category(enriched: &EnrichedSales) -> Vec<GroupTotal> {
    sum_by(enriched, enriched.category_column)
}

pub fn summarize_by_customer(enriched: &EnrichedSales) -> Vec<GroupTotal> {
    sum_by(enriched, enriched.customer_name_column)
}

/// Two-column table `<key>, valor_total_calc` for export
pub fn summary_table(name: &str, key_column: &str, groups: &[GroupTotal]) -> Table {
    let mut table = Table::new(name, vec![key_column.to_string(), LINE_TOTAL.to_string()]);
    table.rows = groups
        .iter()
        .map(|g| vec![g.key.clone(), Value::Real(g.total)])
        .collect();
    table
}

// ============================================================================
// REPORT
// ============================================================================

/// Everything the exporter needs from one run
#[derive(Debug, Clone, PartialEq)]
pub struct SalesReport {
    pub enriched: EnrichedSales,
    pub by_category: Vec<GroupTotal>,
    pub by_customer: Vec<GroupTotal>,
    pub average_ticket: Option<f64>,
}

impl SalesReport {
    pub fn category_table(&self) -> Table {
        let key = &self.enriched.table.columns[self.enriched.category_column];
        summary_table("resumo_categorias", key, &self.by_category)
    }

    pub fn customer_table(&self) -> Table {
        let key = &self.enriched.table.columns[self.enriched.customer_name_column];
        summary_table("resumo_clientes", key, &self.by_customer)
    }
}

pub fn build_report(tables: &SourceTables) -> Result<SalesReport> {
    let enriched = enrich_sales(tables)?;
    let by_category = summarize_by_category(&enriched);
    let by_customer = summarize_by_customer(&enriched);
    let average_ticket = average_ticket(&enriched);

    Ok(SalesReport {
        enriched,
        by_category,
        by_customer,
        average_ticket,
    })
}
