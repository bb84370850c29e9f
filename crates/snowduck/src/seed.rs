//! JSON seed-data loading.
//!
//! Seed files map table names to row objects:
//!
//! ```json
//! { "clients": [ { "id": 1, "name": "Acme" } ] }
//! ```
//!
//! Rows are rendered into INSERT statements and sent through
//! [`Querier::run_raw`], so they commit like any other DML.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value as JsonValue;
use tracing::info;

use crate::adapter::ddl::quote_ident;
use crate::error::Result;
use crate::querier::Querier;

/// Load a seed file into the querier's engine. Returns the number of rows
/// inserted.
pub fn load_seed_file(querier: &dyn Querier, path: &Path) -> Result<u64> {
    let contents = fs::read_to_string(path)?;
    let seed: BTreeMap<String, Vec<BTreeMap<String, JsonValue>>> =
        serde_json::from_str(&contents)?;

    let mut inserted = 0u64;
    for (table, rows) in &seed {
        for row in rows {
            let columns: Vec<String> = row.keys().map(|k| quote_ident(k)).collect();
            let values: Vec<String> = row.values().map(sql_literal).collect();
            let sql = format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_ident(table),
                columns.join(", "),
                values.join(", ")
            );
            querier.run_raw(&sql)?;
            inserted += 1;
        }
        info!(table = %table, rows = rows.len(), "seed data loaded");
    }
    Ok(inserted)
}

/// Render a JSON value as a SQL literal.
fn sql_literal(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "NULL".to_string(),
        JsonValue::Bool(true) => "TRUE".to_string(),
        JsonValue::Bool(false) => "FALSE".to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => format!("'{}'", s.replace('\'', "''")),
        other => format!("'{}'", other.to_string().replace('\'', "''")),
    }
}
