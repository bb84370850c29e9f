//! Schema metadata adapter: warehouse schemas to embedded-engine schemas.
//!
//! Conversion is total. Every input schema yields an output schema; types
//! with no structured mapping fall back to their affinity family, and
//! types with no guessable family pass through verbatim.

pub mod ddl;

use std::fmt;

use tracing::info;

use crate::core::schema::{
    ColumnDescription, ColumnType, ConstraintKind, SchemaDescription, TableDescription,
    TypeAffinity, SNOWFLAKE_MAX_VARCHAR,
};

/// Converts warehouse schema metadata into a form the embedded engine
/// accepts: type substitutions, identity stripping, default dropping, and
/// elision of named FK/CHECK/UNIQUE constraints.
#[derive(Debug, Default)]
pub struct MetadataAdapter;

impl MetadataAdapter {
    pub fn new() -> Self {
        MetadataAdapter
    }

    /// Convert a whole schema. Never fails.
    pub fn adapt(&self, schema: &SchemaDescription) -> SchemaDescription {
        SchemaDescription {
            tables: schema.tables.iter().map(|t| self.adapt_table(t)).collect(),
        }
    }

    /// Report every column whose type differs between a source schema and
    /// its adapted counterpart. Purely observational.
    ///
    /// Changes are also logged at info level, one line per column.
    pub fn summarize(
        &self,
        source: &SchemaDescription,
        adapted: &SchemaDescription,
    ) -> ConversionReport {
        let mut report = ConversionReport::default();
        for table in &source.tables {
            let Some(adapted_table) = adapted.table(&table.name) else {
                continue;
            };
            let mut conversion = TableConversion {
                table: table.name.clone(),
                changes: Vec::new(),
            };
            for column in &table.columns {
                let Some(adapted_column) = adapted_table.column(&column.name) else {
                    continue;
                };
                if adapted_column.column_type != column.column_type {
                    info!(
                        table = %table.name,
                        column = %column.name,
                        from = %column.column_type,
                        to = %adapted_column.column_type,
                        "column type converted"
                    );
                    conversion.changes.push(ColumnChange {
                        column: column.name.clone(),
                        from: column.column_type.clone(),
                        to: adapted_column.column_type.clone(),
                    });
                }
            }
            if !conversion.changes.is_empty() {
                report.tables.push(conversion);
            }
        }
        report
    }

    /// Render the CREATE TABLE statement the embedded engine would receive
    /// for one table of the input schema.
    pub fn preview_ddl(&self, table: &TableDescription) -> String {
        ddl::render_create_table(&self.adapt_table(table))
    }

    fn adapt_table(&self, table: &TableDescription) -> TableDescription {
        TableDescription {
            name: table.name.clone(),
            columns: table.columns.iter().map(convert_column).collect(),
            constraints: table
                .constraints
                .iter()
                .filter(|c| !is_elided_constraint(c.name.as_str(), c.kind))
                .cloned()
                .collect(),
        }
    }
}

/// Named constraints the embedded engine either cannot honor or that the
/// column definitions already carry.
fn is_elided_constraint(name: &str, kind: ConstraintKind) -> bool {
    kind == ConstraintKind::PrimaryKey
        || name.contains("FK_")
        || name.contains("CHK_")
        || name.contains("UQ_")
}

fn convert_column(column: &ColumnDescription) -> ColumnDescription {
    ColumnDescription {
        name: column.name.clone(),
        column_type: convert_type(&column.column_type),
        nullable: column.nullable,
        primary_key: column.primary_key,
        // Identity sequences and server defaults are warehouse-side
        // concerns; the embedded engine gets plain columns.
        identity: false,
        default: None,
    }
}

/// Type substitution, first matching rule wins.
fn convert_type(ty: &ColumnType) -> ColumnType {
    match ty {
        // Snowflake's NUMBER(38,0) surrogate-key idiom.
        ColumnType::Decimal {
            precision: 38,
            scale: 0,
        } => ColumnType::Integer,
        ColumnType::Text => ColumnType::Varchar { length: None },
        ColumnType::Varchar {
            length: Some(SNOWFLAKE_MAX_VARCHAR),
        } => ColumnType::Varchar { length: None },
        ColumnType::TimestampNtz | ColumnType::TimestampTz | ColumnType::Timestamp => {
            ColumnType::Timestamp
        }
        ColumnType::Varchar { length } => ColumnType::Varchar { length: *length },
        ColumnType::Decimal { precision, scale } => ColumnType::Decimal {
            precision: *precision,
            scale: *scale,
        },
        ColumnType::Integer => ColumnType::Integer,
        ColumnType::Boolean => ColumnType::Boolean,
        ColumnType::Other(_) => match ty.affinity() {
            Some(TypeAffinity::Integer) => ColumnType::Integer,
            Some(TypeAffinity::String) => ColumnType::Varchar { length: None },
            Some(TypeAffinity::Decimal) => ColumnType::Decimal {
                precision: 38,
                scale: 10,
            },
            Some(TypeAffinity::Timestamp) => ColumnType::Timestamp,
            None => ty.clone(),
        },
    }
}

/// One column whose type changed during conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnChange {
    pub column: String,
    pub from: ColumnType,
    pub to: ColumnType,
}

/// All type changes for one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableConversion {
    pub table: String,
    pub changes: Vec<ColumnChange>,
}

/// Per-table summary of what `adapt` would change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionReport {
    pub tables: Vec<TableConversion>,
}

impl ConversionReport {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn change_count(&self) -> usize {
        self.tables.iter().map(|t| t.changes.len()).sum()
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tables.is_empty() {
            return writeln!(f, "No type conversions required.");
        }
        for table in &self.tables {
            writeln!(f, "{}:", table.table)?;
            for change in &table.changes {
                writeln!(f, "  {}: {} -> {}", change.column, change.from, change.to)?;
            }
        }
        Ok(())
    }
}
