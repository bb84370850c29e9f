//! Targeted pre-rewrite rules applied before generic transpilation.
//!
//! These cover constructs the generic transpiler renders in a form the
//! target engine rejects. Rules run on the raw SQL text, before parsing,
//! so a rule can fire even when the statement as a whole would not parse.

use regex::Regex;

use super::Dialect;

/// Apply every rewrite rule registered for the target dialect.
///
/// Unknown targets and statements that match no rule pass through
/// unchanged.
pub fn apply_engine_rewrites(sql: &str, target: Dialect) -> String {
    match target {
        Dialect::DuckDb => rewrite_listagg_distinct(sql),
        Dialect::Snowflake => sql.to_string(),
    }
}

/// Rewrite Snowflake's `LISTAGG(DISTINCT col, sep) WITHIN GROUP (ORDER BY ...)`
/// to DuckDB's `STRING_AGG(DISTINCT col, sep)`.
///
/// DuckDB's STRING_AGG does not accept a WITHIN GROUP clause together with
/// DISTINCT, so the ordering clause is dropped.
fn rewrite_listagg_distinct(sql: &str) -> String {
    let pattern = Regex::new(
        r"(?i)LISTAGG\s*\(\s*DISTINCT\s+([^,]+),\s*([^)]+)\s*\)\s*WITHIN\s+GROUP\s*\(\s*ORDER\s+BY\s+[^)]+\s*\)",
    )
    .unwrap();

    pattern
        .replace_all(sql, |caps: &regex::Captures<'_>| {
            format!(
                "STRING_AGG(DISTINCT {}, {})",
                caps[1].trim(),
                caps[2].trim()
            )
        })
        .into_owned()
}
