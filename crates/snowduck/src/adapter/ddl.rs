//! CREATE TABLE rendering and schema materialization.

use tracing::info;

use crate::core::schema::{SchemaDescription, TableDescription};
use crate::error::Result;
use crate::querier::Querier;

/// Double-quote an identifier, escaping embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Render a CREATE TABLE statement for an already-adapted table.
pub fn render_create_table(table: &TableDescription) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(table.columns.len() + 1);
    for column in &table.columns {
        let mut line = format!("    {} {}", quote_ident(&column.name), column.column_type);
        if !column.nullable {
            line.push_str(" NOT NULL");
        }
        if let Some(default) = &column.default {
            line.push_str(" DEFAULT ");
            line.push_str(default);
        }
        lines.push(line);
    }

    let pk_columns: Vec<String> = table
        .columns
        .iter()
        .filter(|c| c.primary_key)
        .map(|c| quote_ident(&c.name))
        .collect();
    if !pk_columns.is_empty() {
        lines.push(format!("    PRIMARY KEY ({})", pk_columns.join(", ")));
    }

    format!(
        "CREATE TABLE {} (\n{}\n)",
        quote_ident(&table.name),
        lines.join(",\n")
    )
}

/// Materialize every table of an adapted schema through the given querier.
pub fn create_all(querier: &dyn Querier, schema: &SchemaDescription) -> Result<()> {
    for table in schema.tables() {
        let ddl = render_create_table(table);
        info!(table = %table.name, "creating table");
        querier.run_raw(&ddl)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{ColumnDescription, ColumnType};

    #[test]
    fn test_quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("orders"), "\"orders\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_render_create_table() {
        let table = TableDescription {
            name: "orders".to_string(),
            columns: vec![
                ColumnDescription {
                    name: "id".to_string(),
                    column_type: ColumnType::Integer,
                    nullable: false,
                    primary_key: true,
                    identity: false,
                    default: None,
                },
                ColumnDescription {
                    name: "status".to_string(),
                    column_type: ColumnType::Varchar { length: Some(50) },
                    nullable: true,
                    primary_key: false,
                    identity: false,
                    default: None,
                },
            ],
            constraints: vec![],
        };

        let ddl = render_create_table(&table);
        assert_eq!(
            ddl,
            "CREATE TABLE \"orders\" (\n    \"id\" INTEGER NOT NULL,\n    \"status\" VARCHAR(50),\n    PRIMARY KEY (\"id\")\n)"
        );
    }
}
