//! Configuration data structures.

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;

/// Which backend engine to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    DuckDb,
    Snowflake,
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub engine: Engine,

    /// Dialect the project's SQL files are written in.
    #[serde(default = "default_authoring_dialect")]
    pub authoring_dialect: Dialect,

    /// Directory that file-based SQL sources resolve against.
    #[serde(default = "default_sql_root")]
    pub sql_root: String,

    #[serde(default)]
    pub duckdb: DuckDbConfig,

    pub snowflake: Option<SnowflakeConfig>,
}

fn default_authoring_dialect() -> Dialect {
    Dialect::Snowflake
}

fn default_sql_root() -> String {
    "sql".to_string()
}

/// Embedded engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuckDbConfig {
    /// Database file path, or `:memory:`.
    #[serde(default = "default_duckdb_path")]
    pub path: String,
}

impl Default for DuckDbConfig {
    fn default() -> Self {
        DuckDbConfig {
            path: default_duckdb_path(),
        }
    }
}

fn default_duckdb_path() -> String {
    ":memory:".to_string()
}

/// Warehouse connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnowflakeConfig {
    pub account: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub schema: String,
    pub warehouse: String,
    pub role: Option<String>,
}

impl SnowflakeConfig {
    /// Build the ODBC connection string for the Snowflake driver.
    pub fn connection_string(&self) -> String {
        let mut conn = format!(
            "Driver={{SnowflakeDSIIDriver}};Server={}.snowflakecomputing.com;Uid={};Pwd={};Database={};Schema={};Warehouse={};",
            self.account, self.user, self.password, self.database, self.schema, self.warehouse
        );
        if let Some(role) = &self.role {
            conn.push_str(&format!("Role={};", role));
        }
        conn
    }
}
