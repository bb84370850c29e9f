//! Query execution against a backend engine.
//!
//! A [`Querier`] is bound to one engine for its lifetime. Callers author
//! SQL in a declared dialect; `execute` resolves each statement to the
//! engine's dialect before it runs. Resolution never fails a statement by
//! itself: when the transpiler cannot handle the input, the original text
//! is sent as-is and the engine gets the final word.

mod duckdb;
#[cfg(feature = "snowflake")]
mod snowflake;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::{Config, Engine};
use crate::core::value::ResultTable;
use crate::dialect::{apply_engine_rewrites, transpile, Dialect};
use crate::error::{BridgeError, Result};

pub use self::duckdb::DuckDbQuerier;
#[cfg(feature = "snowflake")]
pub use self::snowflake::SnowflakeQuerier;

/// A query executor bound to one backend engine.
pub trait Querier {
    /// Dialect of the backend engine.
    fn dialect(&self) -> Dialect;

    /// Dialect the caller's SQL is written in.
    fn authoring_dialect(&self) -> Dialect;

    /// Directory that file-based SQL sources resolve against.
    fn sql_root(&self) -> &Path;

    /// Execute SQL already phrased in the engine's dialect.
    ///
    /// DML statements (leading INSERT/UPDATE/DELETE keyword) are committed
    /// before this returns.
    fn run_raw(&self, sql: &str) -> Result<ResultTable>;

    /// Execute SQL authored in `authoring_dialect`, resolving it to the
    /// engine's dialect first.
    fn execute(&self, sql: &str) -> Result<ResultTable> {
        let resolved = resolve_statement(sql, self.authoring_dialect(), self.dialect());
        self.run_raw(&resolved)
    }

    /// Execute a file-based SQL source, resolved against `sql_root`.
    fn execute_from_source(&self, location: &Path) -> Result<ResultTable> {
        let sql = read_sql_source(self.sql_root(), location)?;
        self.execute(&sql)
    }
}

/// Resolve a statement authored in one dialect for execution in another.
///
/// Same dialect passes through untouched. Otherwise the targeted rewrite
/// rules run first, then the generic transpiler. A transpiler failure is
/// logged and the ORIGINAL text is returned, not the rewritten one, so the
/// engine sees exactly what the caller wrote.
pub fn resolve_statement(sql: &str, authoring: Dialect, target: Dialect) -> String {
    if authoring == target {
        return sql.to_string();
    }

    let rewritten = apply_engine_rewrites(sql, target);
    match transpile(&rewritten, authoring, target) {
        Ok(resolved) => {
            debug!(from = %authoring, to = %target, "statement transpiled");
            resolved
        }
        Err(err) => {
            warn!(
                from = %authoring,
                to = %target,
                error = %err,
                "transpilation failed, executing original statement"
            );
            sql.to_string()
        }
    }
}

/// Read a SQL source file. Absolute locations are used as-is; relative
/// ones resolve against `root`.
pub fn read_sql_source(root: &Path, location: &Path) -> Result<String> {
    let path = if location.is_absolute() {
        location.to_path_buf()
    } else {
        root.join(location)
    };
    if !path.is_file() {
        return Err(BridgeError::SourceNotFound(path));
    }
    Ok(fs::read_to_string(path)?)
}

/// Whether the statement is DML that needs an explicit commit.
pub(crate) fn is_mutation(sql: &str) -> bool {
    let keyword = sql
        .trim_start()
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_ascii_uppercase();
    matches!(keyword.as_str(), "INSERT" | "UPDATE" | "DELETE")
}

/// Build the querier the configuration asks for.
pub fn create_querier(config: &Config) -> Result<Box<dyn Querier>> {
    match config.engine {
        Engine::DuckDb => {
            let querier = DuckDbQuerier::open(
                &config.duckdb.path,
                config.authoring_dialect,
                PathBuf::from(&config.sql_root),
            )?;
            Ok(Box::new(querier))
        }
        Engine::Snowflake => create_snowflake(config),
    }
}

#[cfg(feature = "snowflake")]
fn create_snowflake(config: &Config) -> Result<Box<dyn Querier>> {
    let section = config
        .snowflake
        .as_ref()
        .ok_or_else(|| BridgeError::config("Snowflake engine selected but no snowflake section"))?;
    let querier = SnowflakeQuerier::connect(
        section,
        config.authoring_dialect,
        PathBuf::from(&config.sql_root),
    )?;
    Ok(Box::new(querier))
}

#[cfg(not(feature = "snowflake"))]
fn create_snowflake(_config: &Config) -> Result<Box<dyn Querier>> {
    Err(BridgeError::config(
        "Snowflake engine selected but this build has no 'snowflake' feature",
    ))
}
