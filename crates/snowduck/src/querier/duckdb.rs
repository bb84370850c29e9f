//! Embedded DuckDB backend.

use std::path::{Path, PathBuf};

use chrono::DateTime;
use duckdb::types::{TimeUnit, ValueRef};
use duckdb::Connection;
use tracing::debug;

use super::{is_mutation, Querier};
use crate::core::value::{ResultTable, Value};
use crate::dialect::Dialect;
use crate::error::{BridgeError, Result};

/// Querier over an embedded DuckDB database.
///
/// DuckDB autocommits each statement, which satisfies the commit-on-DML
/// contract of [`Querier::run_raw`].
pub struct DuckDbQuerier {
    conn: Connection,
    authoring_dialect: Dialect,
    sql_root: PathBuf,
}

impl DuckDbQuerier {
    /// Open a database file, or an in-memory database for `:memory:`.
    pub fn open(
        path: &str,
        authoring_dialect: Dialect,
        sql_root: PathBuf,
    ) -> Result<Self> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        debug!(path = %path, "opened duckdb database");
        Ok(DuckDbQuerier {
            conn,
            authoring_dialect,
            sql_root,
        })
    }

    /// In-memory database, mostly for tests and demos.
    pub fn open_in_memory(authoring_dialect: Dialect, sql_root: PathBuf) -> Result<Self> {
        Self::open(":memory:", authoring_dialect, sql_root)
    }

    fn query(&self, sql: &str) -> Result<ResultTable> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| BridgeError::execution("duckdb", e.to_string()))?;

        let mut columns: Vec<String> = Vec::new();
        let mut data: Vec<Vec<Value>> = Vec::new();
        {
            let mut rows = stmt
                .query([])
                .map_err(|e| BridgeError::execution("duckdb", e.to_string()))?;
            while let Some(row) = rows
                .next()
                .map_err(|e| BridgeError::execution("duckdb", e.to_string()))?
            {
                if columns.is_empty() {
                    columns = row
                        .as_ref()
                        .column_names()
                        .iter()
                        .map(|c| c.to_string())
                        .collect();
                }
                let mut record = Vec::with_capacity(columns.len());
                for idx in 0..columns.len() {
                    let cell = row
                        .get_ref(idx)
                        .map_err(|e| BridgeError::execution("duckdb", e.to_string()))?;
                    record.push(convert_value(cell));
                }
                data.push(record);
            }
        }
        // Zero-row results still carry their column names.
        if columns.is_empty() {
            columns = stmt.column_names();
        }

        Ok(ResultTable {
            columns,
            rows: data,
        })
    }
}

impl Querier for DuckDbQuerier {
    fn dialect(&self) -> Dialect {
        Dialect::DuckDb
    }

    fn authoring_dialect(&self) -> Dialect {
        self.authoring_dialect
    }

    fn sql_root(&self) -> &Path {
        &self.sql_root
    }

    fn run_raw(&self, sql: &str) -> Result<ResultTable> {
        if is_mutation(sql) {
            let affected = self
                .conn
                .execute(sql, [])
                .map_err(|e| BridgeError::execution("duckdb", e.to_string()))?;
            debug!(affected, "mutation executed");
            return Ok(ResultTable::default());
        }
        self.query(sql)
    }
}

/// Map one DuckDB cell to a bridge [`Value`].
fn convert_value(cell: ValueRef<'_>) -> Value {
    match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(v) => Value::Bool(v),
        ValueRef::TinyInt(v) => Value::Int(v as i64),
        ValueRef::SmallInt(v) => Value::Int(v as i64),
        ValueRef::Int(v) => Value::Int(v as i64),
        ValueRef::BigInt(v) => Value::Int(v),
        ValueRef::HugeInt(v) => match i64::try_from(v) {
            Ok(n) => Value::Int(n),
            Err(_) => Value::Text(v.to_string()),
        },
        ValueRef::UTinyInt(v) => Value::Int(v as i64),
        ValueRef::USmallInt(v) => Value::Int(v as i64),
        ValueRef::UInt(v) => Value::Int(v as i64),
        ValueRef::UBigInt(v) => match i64::try_from(v) {
            Ok(n) => Value::Int(n),
            Err(_) => Value::Text(v.to_string()),
        },
        ValueRef::Float(v) => Value::Float(v as f64),
        ValueRef::Double(v) => Value::Float(v),
        // The driver's decimal wrapper has no rust_decimal interop, so go
        // through its text rendering.
        ValueRef::Decimal(v) => {
            let rendered = v.to_string();
            match rendered.parse::<rust_decimal::Decimal>() {
                Ok(d) => Value::Decimal(d),
                Err(_) => Value::Text(rendered),
            }
        }
        ValueRef::Timestamp(unit, raw) => {
            let micros = match unit {
                TimeUnit::Second => raw.saturating_mul(1_000_000),
                TimeUnit::Millisecond => raw.saturating_mul(1_000),
                TimeUnit::Microsecond => raw,
                TimeUnit::Nanosecond => raw / 1_000,
            };
            match DateTime::from_timestamp_micros(micros) {
                Some(ts) => Value::Timestamp(ts.naive_utc()),
                None => Value::Null,
            }
        }
        ValueRef::Date32(days) => match DateTime::from_timestamp(days as i64 * 86_400, 0) {
            Some(ts) => Value::Date(ts.date_naive()),
            None => Value::Null,
        },
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        other => Value::Text(format!("{:?}", other)),
    }
}
