//! Configuration validation.

use super::types::{Config, Engine};
use crate::error::{BridgeError, Result};

impl Config {
    /// Validate the configuration after parsing.
    pub fn validate(&self) -> Result<()> {
        if self.sql_root.is_empty() {
            return Err(BridgeError::config("sql_root must not be empty"));
        }
        if self.duckdb.path.is_empty() {
            return Err(BridgeError::config("duckdb.path must not be empty"));
        }
        if self.engine == Engine::Snowflake {
            let section = self.snowflake.as_ref().ok_or_else(|| {
                BridgeError::config("engine is snowflake but the snowflake section is missing")
            })?;
            for (field, value) in [
                ("snowflake.account", &section.account),
                ("snowflake.user", &section.user),
                ("snowflake.password", &section.password),
                ("snowflake.database", &section.database),
                ("snowflake.schema", &section.schema),
                ("snowflake.warehouse", &section.warehouse),
            ] {
                if value.is_empty() {
                    return Err(BridgeError::config(format!("{} must not be empty", field)));
                }
            }
        }
        Ok(())
    }
}
