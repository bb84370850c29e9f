//! # snowduck
//!
//! A dual-engine SQL bridge: author analytics SQL once in the Snowflake
//! dialect and run it either against a Snowflake warehouse or an embedded
//! DuckDB database.
//!
//! Two subsystems carry the weight:
//!
//! - [`querier`]: the [`Querier`] trait plus one implementation per
//!   engine. Cross-dialect statements are resolved with targeted rewrite
//!   rules followed by a generic parser-backed transpiler; if the
//!   transpiler cannot handle a statement, the original text is executed
//!   and the engine decides.
//! - [`adapter`]: [`MetadataAdapter`] converts warehouse schema metadata
//!   (surrogate-key NUMBER(38,0) columns, 16 MB varchars, TIMESTAMP_NTZ,
//!   identity clauses, named constraints) into definitions the embedded
//!   engine accepts.
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use snowduck::{Dialect, DuckDbQuerier, Querier};
//!
//! # fn main() -> snowduck::Result<()> {
//! let querier = DuckDbQuerier::open_in_memory(Dialect::Snowflake, PathBuf::from("sql"))?;
//! let result = querier.execute(
//!     "SELECT LISTAGG(DISTINCT status, ', ') WITHIN GROUP (ORDER BY status) FROM orders",
//! )?;
//! println!("{result}");
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod core;
pub mod dialect;
pub mod error;
pub mod querier;
pub mod seed;

pub use adapter::{ConversionReport, MetadataAdapter};
pub use config::{Config, Engine, SnowflakeConfig};
pub use crate::core::schema::{
    ColumnDescription, ColumnType, ConstraintKind, NamedConstraint, SchemaDescription,
    TableDescription, TypeAffinity,
};
pub use crate::core::value::{ResultTable, Value};
pub use dialect::Dialect;
pub use error::{BridgeError, Result};
pub use querier::{create_querier, DuckDbQuerier, Querier};
#[cfg(feature = "snowflake")]
pub use querier::SnowflakeQuerier;
