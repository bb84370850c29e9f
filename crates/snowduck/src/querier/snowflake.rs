//! Snowflake backend over ODBC.
//!
//! Connections are short-lived: each `run_raw` call opens one, runs the
//! statement, and drops it. Warehouse sessions are cheap to establish and
//! this keeps the querier free of idle-session timeouts.

use std::path::{Path, PathBuf};

use odbc_api::buffers::TextRowSet;
use odbc_api::{Connection, ConnectionOptions, Cursor, Environment, ResultSetMetadata};
use tracing::debug;

use super::{is_mutation, Querier};
use crate::config::SnowflakeConfig;
use crate::core::value::{ResultTable, Value};
use crate::dialect::Dialect;
use crate::error::{BridgeError, Result};

const BATCH_SIZE: usize = 1024;
const MAX_TEXT_BYTES: usize = 65_536;

/// Querier over a Snowflake warehouse via the Snowflake ODBC driver.
pub struct SnowflakeQuerier {
    env: Environment,
    connection_string: String,
    authoring_dialect: Dialect,
    sql_root: PathBuf,
}

impl SnowflakeQuerier {
    /// Build the querier and verify connectivity with one throwaway
    /// connection.
    pub fn connect(
        config: &SnowflakeConfig,
        authoring_dialect: Dialect,
        sql_root: PathBuf,
    ) -> Result<Self> {
        let env = Environment::new().map_err(exec_err)?;
        let querier = SnowflakeQuerier {
            env,
            connection_string: config.connection_string(),
            authoring_dialect,
            sql_root,
        };
        querier.open_connection()?;
        debug!(account = %config.account, "snowflake connectivity verified");
        Ok(querier)
    }

    fn open_connection(&self) -> Result<Connection<'_>> {
        self.env
            .connect_with_connection_string(&self.connection_string, ConnectionOptions::default())
            .map_err(exec_err)
    }
}

impl Querier for SnowflakeQuerier {
    fn dialect(&self) -> Dialect {
        Dialect::Snowflake
    }

    fn authoring_dialect(&self) -> Dialect {
        self.authoring_dialect
    }

    fn sql_root(&self) -> &Path {
        &self.sql_root
    }

    fn run_raw(&self, sql: &str) -> Result<ResultTable> {
        let conn = self.open_connection()?;

        let mut table = ResultTable::default();
        {
            let cursor = conn.execute(sql, ()).map_err(exec_err)?;
            if let Some(mut cursor) = cursor {
                table.columns = cursor
                    .column_names()
                    .map_err(exec_err)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(exec_err)?;

                let mut batch =
                    TextRowSet::for_cursor(BATCH_SIZE, &mut cursor, Some(MAX_TEXT_BYTES))
                        .map_err(exec_err)?;
                let mut row_set = cursor.bind_buffer(&mut batch).map_err(exec_err)?;
                while let Some(chunk) = row_set.fetch().map_err(exec_err)? {
                    for row_idx in 0..chunk.num_rows() {
                        let row = (0..chunk.num_cols())
                            .map(|col_idx| match chunk.at(col_idx, row_idx) {
                                Some(bytes) => {
                                    Value::Text(String::from_utf8_lossy(bytes).into_owned())
                                }
                                None => Value::Null,
                            })
                            .collect();
                        table.rows.push(row);
                    }
                }
            }
        }

        if is_mutation(sql) {
            conn.commit().map_err(exec_err)?;
        }
        Ok(table)
    }
}

fn exec_err(e: impl std::fmt::Display) -> BridgeError {
    BridgeError::execution("snowflake", e.to_string())
}
