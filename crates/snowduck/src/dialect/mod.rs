//! SQL dialect identification and cross-dialect statement resolution.
//!
//! A [`Dialect`] names one of the two engines the bridge speaks. The
//! submodules carry the two halves of statement resolution: targeted
//! pre-rewrite rules ([`rewrite`]) and the generic parser-backed
//! transpiler ([`transpile`]).

pub mod rewrite;
pub mod transpile;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlparser::dialect::{DuckDbDialect, SnowflakeDialect};

use crate::error::BridgeError;

pub use rewrite::apply_engine_rewrites;
pub use transpile::{transpile, TranspileError};

/// SQL dialect understood by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Snowflake,
    DuckDb,
}

impl Dialect {
    /// Lowercase name used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Snowflake => "snowflake",
            Dialect::DuckDb => "duckdb",
        }
    }

    /// Parser implementation for this dialect.
    pub(crate) fn parser_dialect(&self) -> &'static dyn sqlparser::dialect::Dialect {
        match self {
            Dialect::Snowflake => &SnowflakeDialect {},
            Dialect::DuckDb => &DuckDbDialect {},
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "snowflake" => Ok(Dialect::Snowflake),
            "duckdb" => Ok(Dialect::DuckDb),
            other => Err(BridgeError::config(format!(
                "Unknown dialect '{}', expected 'snowflake' or 'duckdb'",
                other
            ))),
        }
    }
}
